//! Aspect-ratio classification used as the storage key prefix.

use std::fmt;

const LANDSCAPE_RATIO: f64 = 16.0 / 9.0;
const PORTRAIT_RATIO: f64 = 9.0 / 16.0;
const TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectClass {
    Landscape,
    Portrait,
    Other,
}

impl AspectClass {
    /// Classify a frame size. Only ratios within `0.01` of 16:9 or 9:16 count
    /// as landscape or portrait; everything else, including a zero height, is
    /// `Other`.
    pub fn classify(width: u32, height: u32) -> Self {
        if height == 0 {
            return AspectClass::Other;
        }

        let ratio = f64::from(width) / f64::from(height);
        if (ratio - LANDSCAPE_RATIO).abs() < TOLERANCE {
            AspectClass::Landscape
        } else if (ratio - PORTRAIT_RATIO).abs() < TOLERANCE {
            AspectClass::Portrait
        } else {
            AspectClass::Other
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            AspectClass::Landscape => "landscape",
            AspectClass::Portrait => "portrait",
            AspectClass::Other => "other",
        }
    }
}

impl fmt::Display for AspectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_resolutions() {
        assert_eq!(AspectClass::classify(1920, 1080), AspectClass::Landscape);
        assert_eq!(AspectClass::classify(1280, 720), AspectClass::Landscape);
        assert_eq!(AspectClass::classify(1080, 1920), AspectClass::Portrait);
        assert_eq!(AspectClass::classify(720, 1280), AspectClass::Portrait);
        assert_eq!(AspectClass::classify(1000, 1000), AspectClass::Other);
        assert_eq!(AspectClass::classify(640, 480), AspectClass::Other);
    }

    #[test]
    fn test_zero_height_is_other() {
        assert_eq!(AspectClass::classify(1920, 0), AspectClass::Other);
        assert_eq!(AspectClass::classify(0, 0), AspectClass::Other);
    }

    #[test]
    fn test_tolerance_boundary() {
        // 16/9 + 0.011 falls just outside the tolerance.
        let height = 9000u32;
        let width = ((LANDSCAPE_RATIO + 0.011) * f64::from(height)).round() as u32;
        assert_eq!(AspectClass::classify(width, height), AspectClass::Other);

        // 16/9 + 0.009 is still landscape.
        let width = ((LANDSCAPE_RATIO + 0.009) * f64::from(height)).round() as u32;
        assert_eq!(AspectClass::classify(width, height), AspectClass::Landscape);
    }

    #[test]
    fn test_prefixes() {
        assert_eq!(AspectClass::Landscape.prefix(), "landscape");
        assert_eq!(AspectClass::Portrait.prefix(), "portrait");
        assert_eq!(AspectClass::Other.to_string(), "other");
    }
}
