/// Terminal front-end: renders a scene graph as ASCII art
use crossterm::{execute, terminal};
use std::io::{stdout, Stdout};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use rascii_core::{Camera, FrameStats, RenderMode, RenderPipeline, Surface};

pub mod config;
pub mod controls;
pub mod demo;
pub mod display;
pub mod error;

pub use config::AppConfig;
pub use controls::{ButtonState, Controls};
pub use demo::DemoScene;
pub use display::AsciiDisplay;
pub use error::{AppError, Result};

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    config: AppConfig,
    scene: DemoScene,
    pipeline: RenderPipeline,
    surface: Surface,
    display: AsciiDisplay<Stdout>,
    controls: Controls,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
    stats: FrameStats,
}

impl TerminalApp {
    pub fn new(config: AppConfig) -> Result<Self> {
        config.validate()?;
        let pipeline = RenderPipeline::new(config.render, Camera::default())
            .with_options(config.render_options());
        let surface = pipeline.create_surface();
        let display = AsciiDisplay::new(
            stdout(),
            config.render.width as usize,
            config.render.height as usize,
        );

        Ok(Self {
            config,
            scene: DemoScene::new()?,
            pipeline,
            surface,
            display,
            controls: Controls::with_defaults(),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
            stats: FrameStats::default(),
        })
    }

    pub fn run(&mut self) -> Result<()> {
        // configuration errors surface before the terminal is touched
        self.pipeline.prepare()?;

        self.controls.init()?;
        let result = self.enter_screen().and_then(|()| self.main_loop());

        // Cleanup, every step runs even if an earlier one failed
        self.pipeline.cleanup();
        let restored = self.leave_screen();
        let shut_down = self.controls.shutdown();

        first_error(result, [restored, shut_down])
    }

    fn enter_screen(&mut self) -> Result<()> {
        execute!(stdout(), terminal::EnterAlternateScreen)?;
        self.display.prepare()
    }

    fn leave_screen(&mut self) -> Result<()> {
        self.display.cleanup()?;
        execute!(stdout(), terminal::LeaveAlternateScreen)?;
        Ok(())
    }

    fn main_loop(&mut self) -> Result<()> {
        let target_frame_time = self.config.frame_time();
        let dt = target_frame_time.as_secs_f32();

        while self.running {
            let frame_start = Instant::now();

            self.handle_input(dt)?;
            self.scene.step(dt)?;
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            } else {
                debug!(?elapsed, "frame over budget");
            }

            // Update FPS counter
            let now = Instant::now();
            if now - self.last_frame >= Duration::from_secs(1) {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        info!("quit requested");
        Ok(())
    }

    fn handle_input(&mut self, dt: f32) -> Result<()> {
        self.controls.poll()?;

        if self.controls.interrupted() || self.controls.pressed(controls::QUIT) {
            self.running = false;
        }
        if self.controls.pressed(controls::TOGGLE_MODE) {
            let options = self.pipeline.options_mut();
            options.mode = match options.mode {
                RenderMode::Wireframe => RenderMode::Filled,
                RenderMode::Filled => RenderMode::Wireframe,
            };
        }
        if self.controls.pressed(controls::RESET) {
            self.scene.reset()?;
        }

        self.scene.steer(
            self.controls.axis(controls::LOOK),
            self.controls.axis(controls::MOVE),
            dt,
        )?;
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        self.stats = self.pipeline.render(self.scene.graph(), &mut self.surface)?;
        self.display.draw(&self.surface)?;

        // Draw UI overlay
        let status = format!(
            "RASCII | FPS: {:.1} | Triangles: {} | WASD=Move Arrows=Turn M=Mode R=Reset Q=Quit",
            self.fps, self.stats.triangles_drawn
        );
        self.display.status_line(&status)
    }
}

/// The loop's own error wins; otherwise the first failed cleanup step.
fn first_error(result: Result<()>, cleanup: impl IntoIterator<Item = Result<()>>) -> Result<()> {
    result?;
    cleanup.into_iter().collect()
}
