use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{render::MergeOverlay, Algorithm, Result, SortVizError};

/// Fastest position on the speed slider.
pub const MAX_SPEED: u8 = 100;

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub surface: SurfaceConfig,
    pub session: SessionConfig,
}

impl AppConfig {
    /// Parses a configuration from a JSON document and validates it.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        self.surface.validate()?;
        validate_size(self.session.size)
    }
}

/// Geometry of the draw surface, in display units.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub width: f32,
    pub height: f32,
    /// Headroom kept free above the tallest possible bar; generated values
    /// stay below `height - margin`.
    pub margin: u32,
    /// Smallest value handed out by the generator.
    pub min_value: u32,
    pub merge_overlay: MergeOverlay,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
            margin: 20,
            min_value: 5,
            merge_overlay: MergeOverlay::Approximate,
        }
    }
}

impl SurfaceConfig {
    /// Exclusive upper bound for generated values.
    pub fn value_ceiling(&self) -> u32 {
        (self.height as u32).saturating_sub(self.margin)
    }

    /// Number of distinct values the generator may produce.
    pub fn value_span(&self) -> u32 {
        self.value_ceiling().saturating_sub(self.min_value)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(SortVizError::invalid(format!(
                "surface width must be positive, got {}",
                self.width
            )));
        }
        if !self.height.is_finite() || self.value_span() == 0 {
            return Err(SortVizError::invalid(format!(
                "surface height {} with a {} unit margin leaves no values from {} upwards",
                self.height, self.margin, self.min_value
            )));
        }
        Ok(())
    }
}

/// Parameters normally owned by the controls of the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub size: usize,
    pub delay_ms: u64,
    pub algorithm: Algorithm,
    /// Fixed RNG seed so generated sequences can be replayed.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            size: 100,
            delay_ms: 100,
            algorithm: Algorithm::Bubble,
            seed: None,
        }
    }
}

pub fn validate_size(size: usize) -> Result<()> {
    if size == 0 {
        return Err(SortVizError::invalid("array size must be at least 1"));
    }
    Ok(())
}

/// Converts a speed slider position (1 = slowest, 100 = fastest) into a step
/// delay in milliseconds.
pub fn delay_from_speed(speed: u8) -> Result<u64> {
    if speed == 0 || speed > MAX_SPEED {
        return Err(SortVizError::invalid(format!(
            "speed must be between 1 and {MAX_SPEED}, got {speed}"
        )));
    }
    Ok(u64::from(MAX_SPEED + 1 - speed))
}
