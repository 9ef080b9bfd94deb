//! # Enhancement Parameters
//!
//! The five user-tunable values read by the filter stages, and the
//! [`ParamEvent`] type the viewer emits whenever a slider moves.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::{ParamError, Result};

/// Tunable parameters for one run of the enhancement pipeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhanceParams {
    /// Offset added to the Lab `a` (green-red) channel after neutralisation
    pub a_shift: i32,

    /// Offset added to the Lab `b` (blue-yellow) channel after neutralisation
    pub b_shift: i32,

    /// Haze removal strength (0.0-1.0)
    pub omega: f32,

    /// CLAHE clip limit (0.0-5.0, floored to 0.1 when applied)
    pub clahe_clip: f32,

    /// Blend percentage between the red channel and its equalized version (0-100)
    pub red_strength: u8,
}

impl Default for EnhanceParams {
    fn default() -> Self {
        Self {
            a_shift: 0,
            b_shift: 0,
            omega: 0.75,
            clahe_clip: 1.2,
            red_strength: 30,
        }
    }
}

impl EnhanceParams {
    /// Read a parameter as a float, the representation sliders work with
    pub fn get(&self, kind: ParamKind) -> f32 {
        match kind {
            ParamKind::AShift => self.a_shift as f32,
            ParamKind::BShift => self.b_shift as f32,
            ParamKind::Omega => self.omega,
            ParamKind::ClaheClip => self.clahe_clip,
            ParamKind::RedBoost => self.red_strength as f32,
        }
    }

    /// Apply a parameter change.
    ///
    /// On error the previous value is kept untouched.
    pub fn apply(&mut self, event: ParamEvent) -> Result<()> {
        let value = event.kind.check(event.value)?;

        match event.kind {
            ParamKind::AShift => self.a_shift = value.round() as i32,
            ParamKind::BShift => self.b_shift = value.round() as i32,
            ParamKind::Omega => self.omega = value,
            ParamKind::ClaheClip => self.clahe_clip = value,
            ParamKind::RedBoost => self.red_strength = value.round() as u8,
        }

        Ok(())
    }

    /// Check every field against its slider range
    pub fn validate(&self) -> Result<()> {
        for kind in ParamKind::ALL {
            kind.check(self.get(kind))?;
        }
        Ok(())
    }

    /// Red blend fraction (0.0-1.0)
    pub fn red_blend(&self) -> f32 {
        self.red_strength as f32 / 100.0
    }
}

/// Identifies one of the tunable parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    AShift,
    BShift,
    Omega,
    ClaheClip,
    RedBoost,
}

impl ParamKind {
    /// All parameters in slider order
    pub const ALL: [ParamKind; 5] = [
        ParamKind::AShift,
        ParamKind::BShift,
        ParamKind::Omega,
        ParamKind::ClaheClip,
        ParamKind::RedBoost,
    ];

    /// Slider label
    pub fn label(self) -> &'static str {
        match self {
            ParamKind::AShift => "A Shift",
            ParamKind::BShift => "B Shift",
            ParamKind::Omega => "Omega",
            ParamKind::ClaheClip => "CLAHE Clip",
            ParamKind::RedBoost => "Red Boost",
        }
    }

    /// Valid domain, identical to the slider range
    pub fn range(self) -> RangeInclusive<f32> {
        match self {
            ParamKind::AShift | ParamKind::BShift => -50.0..=50.0,
            ParamKind::Omega => 0.0..=1.0,
            ParamKind::ClaheClip => 0.0..=5.0,
            ParamKind::RedBoost => 0.0..=100.0,
        }
    }

    /// Whether the slider moves in whole steps
    pub fn is_integer(self) -> bool {
        matches!(self, ParamKind::AShift | ParamKind::BShift | ParamKind::RedBoost)
    }

    fn check(self, value: f32) -> Result<f32> {
        if !value.is_finite() {
            return Err(ParamError::NotFinite {
                name: self.to_string(),
                value,
            }
            .into());
        }

        let range = self.range();
        if !range.contains(&value) {
            return Err(ParamError::OutOfRange {
                name: self.to_string(),
                value,
                min: *range.start(),
                max: *range.end(),
            }
            .into());
        }

        Ok(value)
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single parameter change coming from the UI
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamEvent {
    pub kind: ParamKind,
    pub value: f32,
}

impl ParamEvent {
    pub fn new(kind: ParamKind, value: f32) -> Self {
        Self { kind, value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let params = EnhanceParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.a_shift, 0);
        assert_eq!(params.omega, 0.75);
        assert_eq!(params.clahe_clip, 1.2);
        assert_eq!(params.red_strength, 30);
    }

    #[test]
    fn test_apply_updates_value() {
        let mut params = EnhanceParams::default();
        params.apply(ParamEvent::new(ParamKind::AShift, -12.0)).unwrap();
        params.apply(ParamEvent::new(ParamKind::Omega, 0.4)).unwrap();
        params.apply(ParamEvent::new(ParamKind::RedBoost, 80.0)).unwrap();

        assert_eq!(params.a_shift, -12);
        assert_eq!(params.omega, 0.4);
        assert_eq!(params.red_strength, 80);
        assert_eq!(params.get(ParamKind::RedBoost), 80.0);
    }

    #[test]
    fn test_rejected_event_keeps_previous_value() {
        let mut params = EnhanceParams::default();

        assert!(params.apply(ParamEvent::new(ParamKind::Omega, 1.5)).is_err());
        assert!(params.apply(ParamEvent::new(ParamKind::ClaheClip, f32::NAN)).is_err());
        assert!(params.apply(ParamEvent::new(ParamKind::BShift, 51.0)).is_err());

        assert_eq!(params, EnhanceParams::default());
    }

    #[test]
    fn test_range_bounds_are_accepted() {
        let mut params = EnhanceParams::default();
        for kind in ParamKind::ALL {
            let range = kind.range();
            params.apply(ParamEvent::new(kind, *range.start())).unwrap();
            params.apply(ParamEvent::new(kind, *range.end())).unwrap();
        }
        assert_eq!(params.red_strength, 100);
        assert_eq!(params.clahe_clip, 5.0);
    }

    #[test]
    fn test_red_blend_fraction() {
        let params = EnhanceParams {
            red_strength: 25,
            ..Default::default()
        };
        assert_eq!(params.red_blend(), 0.25);
    }
}
