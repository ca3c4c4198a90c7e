use serde::{Deserialize, Serialize};

use crate::error::EditError;

/// Upper bound for gain and enhancement factors.
pub const MAX_FACTOR: f32 = 8.0;
pub const MAX_BLUR_RADIUS: f32 = 100.0;
pub const MIN_STRETCH: f32 = 0.01;
pub const MAX_STRETCH: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Slider and toggle values applied on top of the source image.
pub struct AdjustmentParameters {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub brightness: f32,
    pub sharpness: f32,
    /// 0 = grayscale, 1 = unchanged.
    pub saturation: f32,
    /// Gaussian sigma in pixels; 0 disables the blur stage.
    pub blur_radius: f32,
    pub stretch_horizontal: f32,
    pub stretch_vertical: f32,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
}

impl Default for AdjustmentParameters {
    fn default() -> Self {
        Self {
            red: 1.0,
            green: 1.0,
            blue: 1.0,
            brightness: 1.0,
            sharpness: 1.0,
            saturation: 1.0,
            blur_radius: 0.0,
            stretch_horizontal: 1.0,
            stretch_vertical: 1.0,
            flip_horizontal: false,
            flip_vertical: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlipState {
    pub horizontal: bool,
    pub vertical: bool,
}

impl AdjustmentParameters {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    pub fn flips(&self) -> FlipState {
        FlipState {
            horizontal: self.flip_horizontal,
            vertical: self.flip_vertical,
        }
    }

    /// Rejects values the pipeline cannot use: negative or non-finite
    /// factors, and stretch factors that are not strictly positive.
    pub fn validate(&self) -> Result<(), EditError> {
        let non_negative = [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("brightness", self.brightness),
            ("sharpness", self.sharpness),
            ("saturation", self.saturation),
            ("blur_radius", self.blur_radius),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() {
                return Err(EditError::invalid(name, format!("{value} is not finite")));
            }
            if value < 0.0 {
                return Err(EditError::invalid(name, format!("{value} is negative")));
            }
        }

        for (name, value) in [
            ("stretch_horizontal", self.stretch_horizontal),
            ("stretch_vertical", self.stretch_vertical),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(EditError::invalid(
                    name,
                    format!("{value} must be greater than zero"),
                ));
            }
        }
        Ok(())
    }

    /// Validates, then clamps every factor into its usable range.
    pub fn sanitized(&self) -> Result<Self, EditError> {
        self.validate()?;
        Ok(Self {
            red: self.red.min(MAX_FACTOR),
            green: self.green.min(MAX_FACTOR),
            blue: self.blue.min(MAX_FACTOR),
            brightness: self.brightness.min(MAX_FACTOR),
            sharpness: self.sharpness.min(MAX_FACTOR),
            saturation: self.saturation.min(MAX_FACTOR),
            blur_radius: self.blur_radius.min(MAX_BLUR_RADIUS),
            stretch_horizontal: self.stretch_horizontal.clamp(MIN_STRETCH, MAX_STRETCH),
            stretch_vertical: self.stretch_vertical.clamp(MIN_STRETCH, MAX_STRETCH),
            ..*self
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_neutral() {
        let p = AdjustmentParameters::default();
        assert!(p.is_default());
        assert_eq!(p.sanitized().unwrap(), p);
        assert_eq!(p.flips(), FlipState::default());
    }

    #[test]
    fn zero_stretch_is_rejected() {
        let mut p = AdjustmentParameters::default();
        p.stretch_horizontal = 0.0;
        let err = p.validate().unwrap_err();
        assert!(matches!(
            err,
            EditError::InvalidParameter {
                name: "stretch_horizontal",
                ..
            }
        ));
    }

    #[test]
    fn negative_stretch_is_rejected() {
        let mut p = AdjustmentParameters::default();
        p.stretch_vertical = -2.0;
        assert!(p.sanitized().is_err());
    }

    #[test]
    fn zero_enhancement_factors_are_allowed() {
        let mut p = AdjustmentParameters::default();
        p.red = 0.0;
        p.brightness = 0.0;
        p.sharpness = 0.0;
        p.saturation = 0.0;
        assert!(p.validate().is_ok());
    }

    #[test]
    fn negative_gain_is_rejected() {
        let mut p = AdjustmentParameters::default();
        p.green = -0.1;
        assert!(matches!(
            p.validate(),
            Err(EditError::InvalidParameter { name: "green", .. })
        ));
    }

    #[test]
    fn nan_is_rejected() {
        let mut p = AdjustmentParameters::default();
        p.blur_radius = f32::NAN;
        assert!(p.validate().is_err());
    }

    #[test]
    fn sanitized_clamps_upper_bounds() {
        let mut p = AdjustmentParameters::default();
        p.saturation = 50.0;
        p.blur_radius = 1e6;
        p.stretch_horizontal = 1e-6;
        p.stretch_vertical = 1e3;
        let s = p.sanitized().unwrap();
        assert_eq!(s.saturation, MAX_FACTOR);
        assert_eq!(s.blur_radius, MAX_BLUR_RADIUS);
        assert_eq!(s.stretch_horizontal, MIN_STRETCH);
        assert_eq!(s.stretch_vertical, MAX_STRETCH);
    }

    #[test]
    fn parameters_parse_with_missing_fields() {
        let p: AdjustmentParameters = toml::from_str("saturation = 0.5").unwrap();
        assert_eq!(p.saturation, 0.5);
        assert_eq!(p.red, 1.0);
        assert!(!p.flip_horizontal);
    }
}
