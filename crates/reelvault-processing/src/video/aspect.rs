use serde::Serialize;
use std::fmt::{Display, Formatter, Result as FmtResult};

const LANDSCAPE_RATIO: f64 = 16.0 / 9.0;
const PORTRAIT_RATIO: f64 = 9.0 / 16.0;

/// Maximum relative deviation from a reference ratio.
const RATIO_TOLERANCE: f64 = 0.1;

/// Aspect ratio bucket used to namespace stored videos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectCategory {
    Landscape,
    Portrait,
    Other,
}

fn within_tolerance(ratio: f64, reference: f64) -> bool {
    (ratio / reference - 1.0).abs() <= RATIO_TOLERANCE
}

impl AspectCategory {
    /// Classify a width/height ratio. Total over all inputs: anything
    /// non-finite or non-positive is `Other`.
    pub fn from_ratio(ratio: f64) -> Self {
        if !ratio.is_finite() || ratio <= 0.0 {
            return AspectCategory::Other;
        }
        if within_tolerance(ratio, LANDSCAPE_RATIO) {
            AspectCategory::Landscape
        } else if within_tolerance(ratio, PORTRAIT_RATIO) {
            AspectCategory::Portrait
        } else {
            AspectCategory::Other
        }
    }

    pub fn from_dimensions(width: u32, height: u32) -> Self {
        if width == 0 || height == 0 {
            return AspectCategory::Other;
        }
        Self::from_ratio(f64::from(width) / f64::from(height))
    }

    /// Storage namespace for this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectCategory::Landscape => "landscape",
            AspectCategory::Portrait => "portrait",
            AspectCategory::Other => "other",
        }
    }
}

impl Display for AspectCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
