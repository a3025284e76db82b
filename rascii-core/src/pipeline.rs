//! Per-frame rendering of a scene graph onto a surface
//!
//! [`RenderPipeline`] owns the settings and camera, derives the projection
//! once in [`RenderPipeline::prepare`] and then turns every mesh triangle of
//! every visited node into surface coordinates and hands it to the
//! [`Rasterizer`]. Changing the settings or camera drops the prepared state;
//! the caller has to prepare again.
use nalgebra::Point2;
use tracing::{debug, instrument, trace};

use crate::error::{Error, Result};
use crate::geometry::{Triangle, Winding};
use crate::projection::{Camera, Projector, RenderSettings};
use crate::raster::Rasterizer;
use crate::scene::SceneGraph;
use crate::surface::{Color, Surface};

/// How triangles are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum RenderMode {
    /// Triangle edges only
    #[default]
    Wireframe,
    /// Scanline-filled interiors
    Filled,
}

/// Drawing options that do not affect the projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub mode: RenderMode,
    pub foreground: Color,
    /// Surface color at the start of every frame
    pub background: Color,
    /// Skip triangles that are not clockwise on the surface
    pub cull_back_faces: bool,
    /// Skip triangles with a vertex closer than the near plane or behind
    /// the camera. With this off such vertices are divided through as is.
    pub clip_behind_camera: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            mode: RenderMode::default(),
            foreground: Color::WHITE,
            background: Color::BLACK,
            cull_back_faces: false,
            clip_behind_camera: true,
        }
    }
}

/// Counters for one rendered frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub nodes_visited: usize,
    pub meshes_rendered: usize,
    pub triangles_drawn: usize,
    pub triangles_culled: usize,
    /// Dropped as degenerate: zero w, behind the camera or non-finite
    pub triangles_skipped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PipelineState {
    Uninitialized,
    Prepared(Projector),
    CleanedUp,
}

/// Scene graph to pixels
#[derive(Debug, Clone)]
pub struct RenderPipeline {
    settings: RenderSettings,
    camera: Camera,
    options: RenderOptions,
    state: PipelineState,
}

impl RenderPipeline {
    pub fn new(settings: RenderSettings, camera: Camera) -> Self {
        Self {
            settings,
            camera,
            options: RenderOptions::default(),
            state: PipelineState::Uninitialized,
        }
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Options take effect on the next frame without preparing again.
    pub fn options_mut(&mut self) -> &mut RenderOptions {
        &mut self.options
    }

    /// Replace the settings. The pipeline must be prepared again.
    pub fn set_settings(&mut self, settings: RenderSettings) {
        self.settings = settings;
        self.state = PipelineState::Uninitialized;
    }

    /// Replace the camera. The pipeline must be prepared again.
    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
        self.state = PipelineState::Uninitialized;
    }

    pub fn is_prepared(&self) -> bool {
        matches!(self.state, PipelineState::Prepared(_))
    }

    /// The prepared projection, if any.
    pub fn projector(&self) -> Option<&Projector> {
        match &self.state {
            PipelineState::Prepared(projector) => Some(projector),
            _ => None,
        }
    }

    /// Validate the configuration and derive the view, projection and
    /// viewport matrices.
    #[instrument(
        level = "debug",
        skip(self),
        fields(width = self.settings.width, height = self.settings.height)
    )]
    pub fn prepare(&mut self) -> Result<()> {
        self.settings.validate()?;
        self.camera.validate()?;

        let projector = Projector::new(&self.settings, &self.camera);
        debug!(
            fov = self.settings.fov,
            near = self.settings.near,
            far = self.settings.far,
            aspect = self.settings.aspect_ratio(),
            "derived projection"
        );
        self.state = PipelineState::Prepared(projector);
        Ok(())
    }

    /// A surface of the configured size, cleared to the background.
    pub fn create_surface(&self) -> Surface {
        Surface::filled(
            self.settings.width as usize,
            self.settings.height as usize,
            self.options.background,
        )
    }

    /// Draw one frame.
    ///
    /// The surface is cleared to the background first, then every node
    /// with a mesh is drawn in pre-order. Triangles that cannot be
    /// projected are skipped and counted; they never fail the frame.
    #[instrument(level = "debug", skip_all, fields(nodes = scene.node_count()))]
    pub fn render(&self, scene: &SceneGraph, surface: &mut Surface) -> Result<FrameStats> {
        let PipelineState::Prepared(projector) = &self.state else {
            return Err(Error::NotPrepared);
        };
        if surface.width() != self.settings.width as usize
            || surface.height() != self.settings.height as usize
        {
            return Err(Error::config(format!(
                "surface is {}x{} but settings ask for {}x{}",
                surface.width(),
                surface.height(),
                self.settings.width,
                self.settings.height
            )));
        }

        let mut stats = FrameStats::default();
        let mut raster = Rasterizer::new(surface);
        raster.fill(self.options.background);

        for (id, node) in scene {
            stats.nodes_visited += 1;
            let Some(mesh) = node.mesh() else {
                continue;
            };
            stats.meshes_rendered += 1;

            let world = scene.world_transform(id)?;
            for triangle in mesh {
                let triangle = triangle.transformed(&world);
                let [a, b, c] = match self.project_triangle(projector, &triangle) {
                    Ok(points) => points,
                    Err(err) => {
                        trace!(node = %id, %err, "skipping triangle");
                        stats.triangles_skipped += 1;
                        continue;
                    }
                };

                if self.options.cull_back_faces && !Winding::of(a, b, c).is_front_facing() {
                    stats.triangles_culled += 1;
                    continue;
                }

                match self.options.mode {
                    RenderMode::Wireframe => raster.draw_triangle(a, b, c, self.options.foreground),
                    RenderMode::Filled => raster.fill_triangle(a, b, c, self.options.foreground),
                }
                stats.triangles_drawn += 1;
            }
        }

        debug!(
            nodes = stats.nodes_visited,
            meshes = stats.meshes_rendered,
            drawn = stats.triangles_drawn,
            culled = stats.triangles_culled,
            skipped = stats.triangles_skipped,
            "frame rendered"
        );
        Ok(stats)
    }

    /// Release the prepared state. Rendering again requires `prepare`.
    pub fn cleanup(&mut self) {
        debug!("render pipeline cleaned up");
        self.state = PipelineState::CleanedUp;
    }

    fn project_triangle(
        &self,
        projector: &Projector,
        triangle: &Triangle,
    ) -> Result<[Point2<f32>; 3]> {
        let mut points = [Point2::origin(); 3];
        for (point, vertex) in points.iter_mut().zip(&triangle.vertices) {
            let projected = projector.project(&vertex.position);
            let w = projected.clip.w;
            if w == 0.0 {
                return Err(Error::degenerate("vertex projects with w = 0"));
            }
            if self.options.clip_behind_camera && w < self.settings.near {
                return Err(Error::degenerate(format!(
                    "vertex at depth {w} is behind the near plane"
                )));
            }

            let screen = projected.screen;
            if !screen.x.is_finite() || !screen.y.is_finite() {
                return Err(Error::degenerate("vertex projects to a non-finite position"));
            }
            *point = screen;
        }
        Ok(points)
    }
}
