//! Projection configuration.
//!
//! [`ProjectionConfig`] holds the options shared by every projection mode.
//! [`ViewportContext`] carries the values the host's texture view would
//! provide, and [`Settings`] bundles both for loading from a TOML file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, UvError};

/// Texture size assumed when no texture context is known.
pub const DEFAULT_TEXTURE_SIZE: u32 = 128;

/// Default pixel density for pixel-scaled unwrapping.
pub const DEFAULT_PIXELS_PER_METER: f64 = 32.0;

/// Default pixel length used by the fixed-footprint reset.
pub const DEFAULT_RESET_PIXEL_SIZE: f64 = 6.0;

/// Weights of the base-edge sort key.
///
/// An edge `(p1, p2)` gets the key
/// `x * (p1.x + p2.x) + y * (p1.y + p2.y) + z * (p1.z + p2.z)`; the edge with
/// the smallest key becomes the bottom edge of the UV layout. The default
/// strongly prefers low Z, then low Y, then low X (Z-up convention).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgePriority {
    /// Weight of the X coordinate sum.
    pub x: f64,
    /// Weight of the Y coordinate sum.
    pub y: f64,
    /// Weight of the Z coordinate sum.
    pub z: f64,
}

impl Default for EdgePriority {
    fn default() -> Self {
        Self {
            x: 1.0,
            y: 100.0,
            z: 1000.0,
        }
    }
}

impl EdgePriority {
    /// Create custom axis weights.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Options for per-face UV projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Pixel density in pixels per meter. For the fixed-footprint reset this
    /// is the pixel length of the reset cell.
    pub pixels_per_meter: f64,

    /// Pixel size of the target texture along the relevant axis.
    pub texture_size_pixels: u32,

    /// Multiply vertex offsets by the object scale before projecting.
    pub correct_for_non_uniform_scale: bool,

    /// Floor the projection offset to the half-pixel-scale grid.
    pub snap_to_pixel_grid: bool,

    /// Horizontal gap between packed faces, in pixels. Zero disables packing.
    pub inter_face_buffer_pixels: f64,

    /// Weights used to pick each polygon's base edge.
    pub edge_priority: EdgePriority,

    /// Whether to use parallel execution when packing is disabled (default: true).
    pub parallel: bool,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            pixels_per_meter: DEFAULT_PIXELS_PER_METER,
            texture_size_pixels: DEFAULT_TEXTURE_SIZE,
            correct_for_non_uniform_scale: false,
            snap_to_pixel_grid: false,
            inter_face_buffer_pixels: 0.0,
            edge_priority: EdgePriority::default(),
            parallel: true,
        }
    }
}

impl ProjectionConfig {
    /// Defaults for the fixed-footprint reset.
    pub fn for_reset() -> Self {
        Self {
            pixels_per_meter: DEFAULT_RESET_PIXEL_SIZE,
            ..Default::default()
        }
    }

    /// Set the pixel density.
    pub fn with_pixels_per_meter(mut self, pixels_per_meter: f64) -> Self {
        self.pixels_per_meter = pixels_per_meter;
        self
    }

    /// Set the texture size in pixels.
    pub fn with_texture_size(mut self, pixels: u32) -> Self {
        self.texture_size_pixels = pixels;
        self
    }

    /// Enable or disable non-uniform scale correction.
    pub fn with_scale_correction(mut self, enabled: bool) -> Self {
        self.correct_for_non_uniform_scale = enabled;
        self
    }

    /// Enable or disable offset snapping.
    pub fn with_pixel_snap(mut self, enabled: bool) -> Self {
        self.snap_to_pixel_grid = enabled;
        self
    }

    /// Set the packing buffer in pixels (zero disables packing).
    pub fn with_buffer(mut self, pixels: f64) -> Self {
        self.inter_face_buffer_pixels = pixels;
        self
    }

    /// Set the base-edge priority weights.
    pub fn with_edge_priority(mut self, priority: EdgePriority) -> Self {
        self.edge_priority = priority;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Whether consecutive faces are laid out side by side.
    #[inline]
    pub fn packing_enabled(&self) -> bool {
        self.inter_face_buffer_pixels != 0.0
    }

    /// Check every option against its valid range.
    pub fn validate(&self) -> Result<()> {
        if !(self.pixels_per_meter.is_finite() && self.pixels_per_meter > 0.0) {
            return Err(UvError::invalid_config(
                "pixels_per_meter",
                self.pixels_per_meter,
                "must be positive and finite",
            ));
        }
        if self.texture_size_pixels == 0 {
            return Err(UvError::invalid_config(
                "texture_size_pixels",
                self.texture_size_pixels,
                "must be positive",
            ));
        }
        if !(self.inter_face_buffer_pixels.is_finite() && self.inter_face_buffer_pixels >= 0.0) {
            return Err(UvError::invalid_config(
                "inter_face_buffer_pixels",
                self.inter_face_buffer_pixels,
                "must be non-negative and finite",
            ));
        }
        if !self.edge_priority.is_finite() {
            return Err(UvError::invalid_config(
                "edge_priority",
                format!("{:?}", self.edge_priority),
                "weights must be finite",
            ));
        }
        Ok(())
    }
}

/// Values normally read from the host's texture view.
///
/// Both fields are optional. Without them the projector falls back to the
/// configured texture size and the texture center `(0.5, 0.5)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportContext {
    /// Size of the texture currently shown, overriding the configured size.
    pub texture_size_pixels: Option<u32>,

    /// UV-space point the projection is centered on (e.g. the view center).
    pub anchor: Option<[f64; 2]>,
}

impl ViewportContext {
    /// Context with a known texture size.
    pub fn with_texture_size(mut self, pixels: u32) -> Self {
        self.texture_size_pixels = Some(pixels);
        self
    }

    /// Context with an explicit UV anchor.
    pub fn with_anchor(mut self, u: f64, v: f64) -> Self {
        self.anchor = Some([u, v]);
        self
    }

    /// Check the override values.
    pub fn validate(&self) -> Result<()> {
        if self.texture_size_pixels == Some(0) {
            return Err(UvError::invalid_config(
                "viewport.texture_size_pixels",
                0,
                "must be positive",
            ));
        }
        if let Some([u, v]) = self.anchor {
            if !(u.is_finite() && v.is_finite()) {
                return Err(UvError::invalid_config(
                    "viewport.anchor",
                    format!("[{}, {}]", u, v),
                    "must be finite",
                ));
            }
        }
        Ok(())
    }
}

/// Everything a projection run needs, as stored in a config file.
///
/// ```toml
/// object_scale = [1.0, 1.0, 2.0]
///
/// [projection]
/// pixels_per_meter = 32.0
/// inter_face_buffer_pixels = 2.0
///
/// [viewport]
/// texture_size_pixels = 256
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Projection options.
    pub projection: ProjectionConfig,
    /// Texture view overrides.
    pub viewport: ViewportContext,
    /// Object scale used by non-uniform scale correction.
    pub object_scale: [f64; 3],
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            projection: ProjectionConfig::default(),
            viewport: ViewportContext::default(),
            object_scale: [1.0, 1.0, 1.0],
        }
    }
}

impl Settings {
    /// Settings with reset defaults.
    pub fn for_reset() -> Self {
        Self {
            projection: ProjectionConfig::for_reset(),
            ..Default::default()
        }
    }

    /// Parse settings from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Render the settings as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Validate all sections.
    pub fn validate(&self) -> Result<()> {
        self.projection.validate()?;
        self.viewport.validate()?;
        if self.object_scale.iter().any(|s| !s.is_finite()) {
            return Err(UvError::invalid_config(
                "object_scale",
                format!("{:?}", self.object_scale),
                "must be finite",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ProjectionConfig::default().validate().is_ok());
        assert!(ProjectionConfig::for_reset().validate().is_ok());
        assert!(!ProjectionConfig::default().packing_enabled());
        assert_eq!(ProjectionConfig::for_reset().pixels_per_meter, 6.0);
    }

    #[test]
    fn test_invalid_values() {
        let zero_density = ProjectionConfig::default().with_pixels_per_meter(0.0);
        assert!(matches!(
            zero_density.validate(),
            Err(UvError::InvalidConfig { name: "pixels_per_meter", .. })
        ));

        let nan_density = ProjectionConfig::default().with_pixels_per_meter(f64::NAN);
        assert!(nan_density.validate().is_err());

        let zero_texture = ProjectionConfig::default().with_texture_size(0);
        assert!(matches!(
            zero_texture.validate(),
            Err(UvError::InvalidConfig { name: "texture_size_pixels", .. })
        ));

        let negative_buffer = ProjectionConfig::default().with_buffer(-1.0);
        assert!(negative_buffer.validate().is_err());

        let viewport = ViewportContext::default().with_texture_size(0);
        assert!(viewport.validate().is_err());
    }

    #[test]
    fn test_settings_from_partial_toml() {
        let text = r#"
            object_scale = [1.0, 2.0, 1.0]

            [projection]
            pixels_per_meter = 16.0
            inter_face_buffer_pixels = 2.0

            [projection.edge_priority]
            z = 10.0

            [viewport]
            texture_size_pixels = 256
            anchor = [0.25, 0.75]
        "#;
        let settings = Settings::from_toml_str(text).unwrap();

        assert_eq!(settings.projection.pixels_per_meter, 16.0);
        assert_eq!(settings.projection.texture_size_pixels, DEFAULT_TEXTURE_SIZE);
        assert!(settings.projection.packing_enabled());
        assert_eq!(settings.projection.edge_priority, EdgePriority::new(1.0, 100.0, 10.0));
        assert_eq!(settings.viewport.texture_size_pixels, Some(256));
        assert_eq!(settings.viewport.anchor, Some([0.25, 0.75]));
        assert_eq!(settings.object_scale, [1.0, 2.0, 1.0]);
    }

    #[test]
    fn test_settings_reject_invalid_values() {
        let text = "[projection]\ntexture_size_pixels = 0\n";
        assert!(matches!(
            Settings::from_toml_str(text),
            Err(UvError::InvalidConfig { .. })
        ));

        assert!(matches!(
            Settings::from_toml_str("projection = 3"),
            Err(UvError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_settings_toml_round_trip() {
        let settings = Settings::for_reset();
        let text = settings.to_toml_string().unwrap();
        assert_eq!(Settings::from_toml_str(&text).unwrap(), settings);
    }
}
