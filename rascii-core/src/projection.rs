/// Render settings, camera and the world-to-surface projection
use nalgebra::{Point2, Point3, Vector3};

use crate::error::{Error, Result};
use crate::math::{Mat4, Mat4Ext, Vec4};

/// Output size and perspective parameters
///
/// `fov` is the vertical field of view in degrees. `near` and `far` are
/// distances along the camera's forward axis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl RenderSettings {
    /// Checked constructor.
    pub fn new(width: u32, height: u32, fov: f32, near: f32, far: f32) -> Result<Self> {
        let settings = Self {
            width,
            height,
            fov,
            near,
            far,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::config(format!(
                "surface size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if !self.fov.is_finite() || self.fov <= 0.0 || self.fov >= 180.0 {
            return Err(Error::config(format!(
                "fov must be in (0, 180) degrees, got {}",
                self.fov
            )));
        }
        if !self.near.is_finite() || self.near <= 0.0 {
            return Err(Error::config(format!(
                "near plane must be positive, got {}",
                self.near
            )));
        }
        if !self.far.is_finite() || self.near >= self.far {
            return Err(Error::config(format!(
                "near plane ({}) must be closer than far plane ({})",
                self.near, self.far
            )));
        }
        Ok(())
    }

    /// `height / width`. Scales x so a unit in world space is as wide as it
    /// is tall on the surface.
    pub fn aspect_ratio(&self) -> f32 {
        self.height as f32 / self.width as f32
    }

    /// Perspective projection in row-vector layout, applied as `v · P`.
    ///
    /// The input's z (distance in front of the camera) is copied into w
    /// by element `(2, 3)`; `(3, 3)` is zero.
    pub fn projection_matrix(&self) -> Mat4 {
        let f = 1.0 / (self.fov.to_radians() / 2.0).tan();
        let q = self.far / (self.far - self.near);

        let mut m = Mat4::zeros();
        m[(0, 0)] = self.aspect_ratio() * f;
        m[(1, 1)] = f;
        m[(2, 2)] = q;
        m[(2, 3)] = 1.0;
        m[(3, 2)] = -self.far * self.near / (self.far - self.near);
        m
    }

    /// Maps NDC `[-1, 1]²` onto `[0, width] x [0, height]`, flipping y so
    /// that NDC +y is the top row.
    #[rustfmt::skip]
    pub fn viewport_matrix(&self) -> Mat4 {
        let half_w = self.width as f32 / 2.0;
        let half_h = self.height as f32 / 2.0;
        Mat4::new(
            half_w, 0.0,     0.0, half_w,
            0.0,    -half_h, 0.0, half_h,
            0.0,    0.0,     1.0, 0.0,
            0.0,    0.0,     0.0, 1.0,
        )
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 128,
            height: 32,
            fov: 90.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

/// Camera configuration for 3D rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
}

impl Camera {
    pub fn new(position: Point3<f32>, target: Point3<f32>, up: Vector3<f32>) -> Self {
        Self {
            position,
            target,
            up,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let forward = self.target - self.position;
        if !forward.iter().chain(self.up.iter()).all(|c| c.is_finite()) {
            return Err(Error::config("camera vectors must be finite"));
        }
        if forward.norm() == 0.0 {
            return Err(Error::config("camera target coincides with its position"));
        }
        if forward.cross(&self.up).norm() == 0.0 {
            return Err(Error::config("camera up vector is parallel to the view direction"));
        }
        Ok(())
    }

    /// Create the view matrix (camera transformation)
    ///
    /// World space is right-handed with the camera looking down -z. The
    /// result has the camera at the origin looking down +z, the direction
    /// the projection treats as depth.
    pub fn view_matrix(&self) -> Mat4 {
        let flip_z = Mat4::new_nonuniform_scaling(&Vector3::new(1.0, 1.0, -1.0));
        flip_z * Mat4::look_at_rh(&self.position, &self.target, &self.up)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Point3::origin(),
            target: Point3::new(0.0, 0.0, -1.0),
            up: Vector3::y(),
        }
    }
}

/// A vertex after projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    /// Clip-space position before the perspective divide
    pub clip: Vec4,
    /// Surface coordinates, y down. Not finite when `clip.w` is zero.
    pub screen: Point2<f32>,
    /// NDC depth
    pub depth: f32,
}

/// Matrices derived once per configuration and reused for every vertex
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    view: Mat4,
    projection: Mat4,
    viewport: Mat4,
}

impl Projector {
    pub fn new(settings: &RenderSettings, camera: &Camera) -> Self {
        Self {
            view: camera.view_matrix(),
            projection: settings.projection_matrix(),
            viewport: settings.viewport_matrix(),
        }
    }

    pub fn view(&self) -> &Mat4 {
        &self.view
    }

    pub fn projection(&self) -> &Mat4 {
        &self.projection
    }

    pub fn viewport(&self) -> &Mat4 {
        &self.viewport
    }

    /// World position to clip space.
    pub fn to_clip(&self, world: &Vec4) -> Vec4 {
        self.projection.transform_row(&(self.view * world))
    }

    /// World position to surface coordinates. The divide is not guarded;
    /// callers inspect `clip.w` and the finiteness of `screen`.
    pub fn project(&self, world: &Vec4) -> Projected {
        let clip = self.to_clip(world);
        let ndc = Vec4::new(clip.x / clip.w, clip.y / clip.w, clip.z / clip.w, 1.0);
        let surface = self.viewport * ndc;
        Projected {
            clip,
            screen: Point2::new(surface.x, surface.y),
            depth: ndc.z,
        }
    }
}
