//! Uniform names understood by the fireball shader.
//!
//! The WGSL `Uniforms` struct in `shaders/fireball.wgsl` uses the same names
//! for its fields; the wgpu backend maps each one to its byte offset.

pub const VIEW_PROJ: &str = "view_proj";
pub const MODEL: &str = "model";
pub const MODEL_INV_TR: &str = "model_inv_tr";
pub const MODEL_VIEW: &str = "model_view";
pub const TIME: &str = "time";

pub const COLOR1: &str = "color1";
pub const COLOR2: &str = "color2";
pub const BLEND1: &str = "blend1";
pub const BLEND2: &str = "blend2";

pub const FBM_AMPLITUDE: &str = "fbm_amplitude";
pub const FBM_FREQUENCY: &str = "fbm_frequency";
pub const FBM_AMPLITUDE_MULTIPLIER: &str = "fbm_amplitude_multiplier";
pub const FBM_FREQUENCY_MULTIPLIER: &str = "fbm_frequency_multiplier";
pub const DISPLACEMENT: &str = "displacement";
pub const LAYER: &str = "layer";
pub const SINE_INTENSITY: &str = "sine_intensity";

pub const ALL: &[&str] = &[
    VIEW_PROJ,
    MODEL,
    MODEL_INV_TR,
    MODEL_VIEW,
    TIME,
    COLOR1,
    COLOR2,
    BLEND1,
    BLEND2,
    FBM_AMPLITUDE,
    FBM_FREQUENCY,
    FBM_AMPLITUDE_MULTIPLIER,
    FBM_FREQUENCY_MULTIPLIER,
    DISPLACEMENT,
    LAYER,
    SINE_INTENSITY,
];
