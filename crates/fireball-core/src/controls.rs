//! Live, user-tweakable parameters and the named-field contract the
//! parameter panel uses to read and write them.

use thiserror::Error;

use crate::geometry::MAX_TESSELLATION;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParamValue {
    Scalar(f32),
    Triple([f32; 3]),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    /// Whole numbers; writes are rounded.
    Integer,
    Scalar,
    /// Three components sharing one range.
    Triple,
}

/// Declared range of one panel parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl ParamSpec {
    const fn scalar(name: &'static str, min: f32, max: f32, step: f32) -> Self {
        Self {
            name,
            kind: ParamKind::Scalar,
            min,
            max,
            step,
        }
    }

    fn clamp(&self, v: f32) -> f32 {
        let v = if v.is_finite() { v } else { self.min };
        let v = v.clamp(self.min, self.max);
        match self.kind {
            ParamKind::Integer => v.round(),
            _ => v,
        }
    }
}

pub const TESSELLATIONS: &str = "tessellations";
pub const FBM_AMPLITUDE: &str = "fbm_amplitude";
pub const FBM_AMPLITUDE_MULTIPLIER: &str = "fbm_amplitude_multiplier";
pub const FBM_FREQUENCY: &str = "fbm_frequency";
pub const FBM_FREQUENCY_MULTIPLIER: &str = "fbm_frequency_multiplier";
pub const DISPLACEMENT: &str = "displacement";
pub const LAYER: &str = "layer";
pub const SINE_INTENSITY: &str = "sine_intensity";
pub const TIME_SCALE: &str = "time_scale";
pub const COLOR: &str = "color";

/// Every panel parameter, in panel order.
pub const PARAMS: &[ParamSpec] = &[
    ParamSpec {
        name: TESSELLATIONS,
        kind: ParamKind::Integer,
        min: 0.0,
        max: MAX_TESSELLATION as f32,
        step: 1.0,
    },
    ParamSpec::scalar(FBM_AMPLITUDE, 0.0, 1.0, 0.01),
    ParamSpec::scalar(FBM_AMPLITUDE_MULTIPLIER, 0.0, 1.0, 0.01),
    ParamSpec::scalar(FBM_FREQUENCY, 0.0, 20.0, 0.1),
    ParamSpec::scalar(FBM_FREQUENCY_MULTIPLIER, 0.0, 4.0, 0.05),
    ParamSpec::scalar(DISPLACEMENT, 0.0, 1.0, 0.01),
    ParamSpec::scalar(LAYER, 0.0, 1.0, 0.01),
    ParamSpec::scalar(SINE_INTENSITY, 0.0, 1.0, 0.01),
    ParamSpec::scalar(TIME_SCALE, 0.0, 10.0, 0.1),
    ParamSpec {
        name: COLOR,
        kind: ParamKind::Triple,
        min: 0.0,
        max: 1.0,
        step: 0.01,
    },
];

pub fn param_spec(name: &str) -> Option<&'static ParamSpec> {
    PARAMS.iter().find(|p| p.name == name)
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControlsError {
    #[error("unknown parameter `{0}`")]
    UnknownParameter(String),
    #[error("parameter `{name}` expects a {expected:?} value")]
    KindMismatch { name: String, expected: ParamKind },
}

/// Snapshot-able parameter set read by the frame driver every tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Controls {
    pub tessellations: u32,
    pub color: [f32; 3],
    pub fbm_amplitude: f32,
    pub fbm_frequency: f32,
    pub displacement: f32,
    pub fbm_amplitude_multiplier: f32,
    pub fbm_frequency_multiplier: f32,
    pub layer: f32,
    pub sine_intensity: f32,
    pub time_scale: f32,
    pub show_floor: bool,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            tessellations: 7,
            color: [1.0, 0.7, 0.5],
            fbm_amplitude: 0.5,
            fbm_frequency: 10.0,
            displacement: 0.6,
            fbm_amplitude_multiplier: 0.5,
            fbm_frequency_multiplier: 2.0,
            layer: 0.1,
            sine_intensity: 1.0,
            time_scale: 1.0,
            show_floor: false,
        }
    }
}

impl Controls {
    pub fn get(&self, name: &str) -> Option<ParamValue> {
        let v = match name {
            TESSELLATIONS => self.tessellations as f32,
            FBM_AMPLITUDE => self.fbm_amplitude,
            FBM_AMPLITUDE_MULTIPLIER => self.fbm_amplitude_multiplier,
            FBM_FREQUENCY => self.fbm_frequency,
            FBM_FREQUENCY_MULTIPLIER => self.fbm_frequency_multiplier,
            DISPLACEMENT => self.displacement,
            LAYER => self.layer,
            SINE_INTENSITY => self.sine_intensity,
            TIME_SCALE => self.time_scale,
            COLOR => return Some(ParamValue::Triple(self.color)),
            _ => return None,
        };
        Some(ParamValue::Scalar(v))
    }

    /// Write a parameter, clamping it into its declared range.
    pub fn set(&mut self, name: &str, value: ParamValue) -> Result<(), ControlsError> {
        let spec =
            param_spec(name).ok_or_else(|| ControlsError::UnknownParameter(name.to_owned()))?;
        match (spec.kind, value) {
            (ParamKind::Triple, ParamValue::Triple(rgb)) => {
                self.color = rgb.map(|c| spec.clamp(c));
            }
            (ParamKind::Integer | ParamKind::Scalar, ParamValue::Scalar(v)) => {
                let v = spec.clamp(v);
                match name {
                    TESSELLATIONS => self.tessellations = v as u32,
                    FBM_AMPLITUDE => self.fbm_amplitude = v,
                    FBM_AMPLITUDE_MULTIPLIER => self.fbm_amplitude_multiplier = v,
                    FBM_FREQUENCY => self.fbm_frequency = v,
                    FBM_FREQUENCY_MULTIPLIER => self.fbm_frequency_multiplier = v,
                    DISPLACEMENT => self.displacement = v,
                    LAYER => self.layer = v,
                    SINE_INTENSITY => self.sine_intensity = v,
                    TIME_SCALE => self.time_scale = v,
                    _ => return Err(ControlsError::UnknownParameter(name.to_owned())),
                }
            }
            _ => {
                return Err(ControlsError::KindMismatch {
                    name: name.to_owned(),
                    expected: spec.kind,
                })
            }
        }
        Ok(())
    }

    /// Move a parameter by `steps` declared steps (negative goes down).
    /// Triples move all three components together.
    pub fn nudge(&mut self, name: &str, steps: f32) -> Result<ParamValue, ControlsError> {
        let spec =
            param_spec(name).ok_or_else(|| ControlsError::UnknownParameter(name.to_owned()))?;
        let delta = spec.step * steps;
        let next = match self.get(name) {
            Some(ParamValue::Scalar(v)) => ParamValue::Scalar(v + delta),
            Some(ParamValue::Triple(rgb)) => ParamValue::Triple(rgb.map(|c| c + delta)),
            None => return Err(ControlsError::UnknownParameter(name.to_owned())),
        };
        self.set(name, next)?;
        self.get(name)
            .ok_or_else(|| ControlsError::UnknownParameter(name.to_owned()))
    }
}
