//! Plot geometry and timing configuration
//!
//! Two presets cover the shipped views: `Default` is the alignment
//! scatterplot (wide right margin holding the legend), `corpus()` is the
//! corpus trend chart. The outer width/height include the margins, scales
//! map into the inner box, and mark positions add the top/left margins
//! back on.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::scale::DEFAULT_TICK_COUNT;

/// Update/exit transition duration shared by all mark families
pub const TRANSITION_MS: u32 = 500;

/// Pixel inset applied at both ends of every scale range, so extreme points
/// are not clipped by the plot box border
pub const RANGE_INSET: f32 = 15.0;

/// Scatter point radius
pub const POINT_RADIUS: f32 = 4.0;

// =============================================================================
// Margins
// =============================================================================

/// Pixel margins around the inner plot box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

// =============================================================================
// PlotConfig
// =============================================================================

/// Geometry and timing for one chart instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotConfig {
    /// Outer canvas width, margins included
    pub width: f32,
    /// Outer canvas height, margins included
    pub height: f32,
    pub margins: Margins,
    pub point_radius: f32,
    pub range_inset: f32,
    pub transition_ms: u32,
    /// Target tick count for auto-generated axes
    pub tick_count: usize,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 750.0,
            height: 230.0,
            margins: Margins {
                top: 0.0,
                right: 400.0,
                bottom: 30.0,
                left: 50.0,
            },
            point_radius: POINT_RADIUS,
            range_inset: RANGE_INSET,
            transition_ms: TRANSITION_MS,
            tick_count: DEFAULT_TICK_COUNT,
        }
    }
}

impl PlotConfig {
    /// Corpus trend chart geometry
    pub fn corpus() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
            margins: Margins {
                top: 0.0,
                right: 70.0,
                bottom: 50.0,
                left: 70.0,
            },
            ..Self::default()
        }
    }

    /// Width of the inner plot box
    pub fn inner_width(&self) -> f32 {
        self.width - self.margins.left - self.margins.right
    }

    /// Height of the inner plot box
    pub fn inner_height(&self) -> f32 {
        self.height - self.margins.top - self.margins.bottom
    }

    /// Horizontal scale range, inset from the plot box edges
    pub fn x_range(&self) -> (f32, f32) {
        (self.range_inset, self.inner_width() - self.range_inset)
    }

    /// Vertical scale range; inverted so larger values sit higher
    pub fn y_range(&self) -> (f32, f32) {
        (self.inner_height() - self.range_inset, self.range_inset)
    }

    /// Reject geometries with no drawable inner area
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.inner_width() <= 0.0 || self.inner_height() <= 0.0 {
            return Err(ConfigError::NonPositivePlotArea {
                inner_width: self.inner_width(),
                inner_height: self.inner_height(),
            });
        }
        Ok(())
    }
}

// =============================================================================
// ConfigError
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Margins consume the whole canvas
    NonPositivePlotArea { inner_width: f32, inner_height: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositivePlotArea {
                inner_width,
                inner_height,
            } => write!(
                f,
                "Margins leave no drawable plot area ({}x{})",
                inner_width, inner_height
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_alignment_view_geometry() {
        let config = PlotConfig::default();
        assert_eq!(config.inner_width(), 300.0);
        assert_eq!(config.inner_height(), 200.0);
        assert_eq!(config.x_range(), (15.0, 285.0));
        assert_eq!(config.y_range(), (185.0, 15.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_corpus_preset_geometry() {
        let config = PlotConfig::corpus();
        assert_eq!(config.inner_width(), 660.0);
        assert_eq!(config.inner_height(), 350.0);
        assert_eq!(config.transition_ms, TRANSITION_MS);
    }

    #[test]
    fn test_validate_rejects_margin_overflow() {
        let config = PlotConfig {
            width: 100.0,
            margins: Margins {
                top: 0.0,
                right: 80.0,
                bottom: 0.0,
                left: 40.0,
            },
            ..PlotConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositivePlotArea { .. })
        ));
    }
}
