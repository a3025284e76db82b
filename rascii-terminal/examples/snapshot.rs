/// Example: Render a few frames of the demo scene to stdout without taking
/// over the terminal
///
/// Usage: cargo run --example snapshot -- [config.ron]
use std::env;
use std::io::{self, Write};

use rascii_core::{Camera, RenderPipeline};
use rascii_terminal::{AppConfig, AsciiDisplay, DemoScene, Result};

fn main() -> Result<()> {
    let config = match env::args_os().nth(1) {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    config.validate()?;

    let mut pipeline =
        RenderPipeline::new(config.render, Camera::default()).with_options(config.render_options());
    pipeline.prepare()?;
    let mut surface = pipeline.create_surface();

    let mut scene = DemoScene::new()?;
    let mut display = AsciiDisplay::new(
        io::sink(),
        config.render.width as usize,
        config.render.height as usize,
    );

    let mut stdout = io::stdout().lock();
    for frame in 0..3 {
        let stats = pipeline.render(scene.graph(), &mut surface)?;
        writeln!(stdout, "frame {frame}: {} triangles drawn", stats.triangles_drawn)?;
        stdout.write_all(display.compose(&surface)?.as_bytes())?;
        scene.step(0.5)?;
    }

    pipeline.cleanup();
    Ok(())
}
