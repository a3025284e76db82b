//! Application configuration
//!
//! Stored as RON. Every field is optional in the file; missing ones take
//! their defaults, so an empty `()` is a valid config.

use std::fs;
use std::path::Path;
use std::time::Duration;

use rascii_core::{Color, RenderMode, RenderOptions, RenderSettings};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub render: RenderSettings,
    /// Target frames per second
    pub fps: u32,
    pub mode: RenderMode,
    pub cull_back_faces: bool,
    pub clip_behind_camera: bool,
    /// Grey level of empty cells, 0..=1
    pub background: f32,
    /// Grey level of drawn geometry, 0..=1
    pub foreground: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            render: RenderSettings::default(),
            fps: 30,
            mode: RenderMode::Wireframe,
            cull_back_faces: false,
            clip_behind_camera: true,
            background: 0.0,
            foreground: 1.0,
        }
    }
}

impl AppConfig {
    /// Load a config from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron(&contents)
    }

    /// Parse a config from a RON string
    pub fn from_ron(s: &str) -> Result<Self> {
        Ok(ron::from_str(s)?)
    }

    /// Save the config to a RON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .indentor("  ".to_string());
        let contents = ron::ser::to_string_pretty(self, pretty)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Check the application-level fields. Render settings are validated
    /// by the pipeline when it is prepared.
    pub fn validate(&self) -> Result<()> {
        if self.fps == 0 {
            return Err(AppError::config("fps must be at least 1"));
        }
        for (name, level) in [("background", self.background), ("foreground", self.foreground)] {
            if !(0.0..=1.0).contains(&level) {
                return Err(AppError::config(format!(
                    "{name} must be a grey level in 0..=1, got {level}"
                )));
            }
        }
        Ok(())
    }

    pub fn frame_time(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps.max(1) as f64)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            mode: self.mode,
            foreground: Color::greyscale(self.foreground),
            background: Color::greyscale(self.background),
            cull_back_faces: self.cull_back_faces,
            clip_behind_camera: self.clip_behind_camera,
        }
    }

    /// Shrink the frame so it fits a terminal of `columns` x `rows`, keeping
    /// the last row for the status line.
    pub fn fit_terminal(mut self, columns: u16, rows: u16) -> Self {
        let rows = u32::from(rows.saturating_sub(1)).max(1);
        self.render.width = self.render.width.min(u32::from(columns).max(1));
        self.render.height = self.render.height.min(rows);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.render, RenderSettings::default());
        assert_eq!(config.fps, 30);
        assert_eq!(config.mode, RenderMode::Wireframe);
        assert!(config.clip_behind_camera);
        assert!(!config.cull_back_faces);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = AppConfig::from_ron("(fps: 15, mode: filled, render: (width: 80))").unwrap();
        assert_eq!(config.fps, 15);
        assert_eq!(config.mode, RenderMode::Filled);
        assert_eq!(config.render.width, 80);
        assert_eq!(config.render.height, 32);
        assert!((config.render.fov - 90.0).abs() < 1e-6);

        assert_eq!(AppConfig::from_ron("()").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            AppConfig::from_ron("(fps: \"fast\")"),
            Err(AppError::Parse(_))
        ));
        assert!(matches!(
            AppConfig::from_ron("(mode: shaded)"),
            Err(AppError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "(render: (width: 64, height: 20, fov: 60.0), cull_back_faces: true)").unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.render.width, 64);
        assert_eq!(config.render.height, 20);
        assert!(config.cull_back_faces);
        assert_eq!(config.fps, 30);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::load(dir.path().join("missing.ron"));
        assert!(matches!(result, Err(AppError::Io(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rascii.ron");
        let config = AppConfig {
            fps: 12,
            mode: RenderMode::Filled,
            background: 0.25,
            ..AppConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(AppConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_validate() {
        let config = AppConfig {
            fps: 0,
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(AppError::Config(_))));

        let config = AppConfig {
            foreground: 1.5,
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_render_options() {
        let config = AppConfig {
            background: 0.0,
            foreground: 0.5,
            cull_back_faces: true,
            ..AppConfig::default()
        };
        let options = config.render_options();
        assert_eq!(options.background, Color::BLACK);
        assert_eq!(options.foreground, Color::greyscale(0.5));
        assert!(options.cull_back_faces);
        assert!(options.clip_behind_camera);
    }

    #[test]
    fn test_fit_terminal() {
        let config = AppConfig::default().fit_terminal(80, 24);
        assert_eq!((config.render.width, config.render.height), (80, 23));

        let config = AppConfig::default().fit_terminal(200, 60);
        assert_eq!((config.render.width, config.render.height), (128, 32));

        let config = AppConfig::default().fit_terminal(0, 0);
        assert_eq!((config.render.width, config.render.height), (1, 1));
    }

    #[test]
    fn test_frame_time() {
        let config = AppConfig::default();
        assert_eq!(config.frame_time().as_millis(), 33);
    }
}
