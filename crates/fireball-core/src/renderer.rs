use glam::{Mat4, Vec3};
use thiserror::Error;

use crate::backend::{BackendError, ShaderBackend};
use crate::camera::Camera;
use crate::constants::{InstanceStyle, NOMINAL_FRAME_RATE};
use crate::controls::Controls;
use crate::drawable::Drawable;
use crate::shader::ShaderProgram;
use crate::uniforms;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("render failed: {0}")]
    Backend(#[from] BackendError),
}

/// Shader parameters for one render call. Built fresh every tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationParams {
    pub time_scale: f32,
    pub fbm_amplitude: f32,
    pub fbm_frequency: f32,
    pub fbm_amplitude_multiplier: f32,
    pub fbm_frequency_multiplier: f32,
    pub displacement: f32,
    pub layer: f32,
    pub sine_intensity: f32,
    pub color1: Vec3,
    pub color2: Vec3,
    pub blend1: f32,
    pub blend2: f32,
}

impl AnimationParams {
    pub fn from_controls(controls: &Controls, style: &InstanceStyle) -> Self {
        Self {
            time_scale: controls.time_scale,
            fbm_amplitude: controls.fbm_amplitude,
            fbm_frequency: controls.fbm_frequency,
            fbm_amplitude_multiplier: controls.fbm_amplitude_multiplier,
            fbm_frequency_multiplier: controls.fbm_frequency_multiplier,
            displacement: controls.displacement,
            layer: controls.layer,
            sine_intensity: controls.sine_intensity,
            color1: style.color1,
            color2: style.color2,
            blend1: style.blend1,
            blend2: style.blend2,
        }
    }
}

/// Upload the per-call globals: matrices, clock and animation parameters.
fn upload_globals<B: ShaderBackend + ?Sized>(
    backend: &mut B,
    program: &mut ShaderProgram,
    view_proj: Mat4,
    time: f32,
    p: &AnimationParams,
) -> Result<(), BackendError> {
    program.set_uniform(backend, uniforms::VIEW_PROJ, view_proj)?;
    program.set_uniform(backend, uniforms::TIME, time)?;
    program.set_uniform(backend, uniforms::COLOR1, p.color1)?;
    program.set_uniform(backend, uniforms::COLOR2, p.color2)?;
    program.set_uniform(backend, uniforms::BLEND1, p.blend1)?;
    program.set_uniform(backend, uniforms::BLEND2, p.blend2)?;
    program.set_uniform(backend, uniforms::FBM_AMPLITUDE, p.fbm_amplitude)?;
    program.set_uniform(backend, uniforms::FBM_FREQUENCY, p.fbm_frequency)?;
    program.set_uniform(
        backend,
        uniforms::FBM_AMPLITUDE_MULTIPLIER,
        p.fbm_amplitude_multiplier,
    )?;
    program.set_uniform(
        backend,
        uniforms::FBM_FREQUENCY_MULTIPLIER,
        p.fbm_frequency_multiplier,
    )?;
    program.set_uniform(backend, uniforms::DISPLACEMENT, p.displacement)?;
    program.set_uniform(backend, uniforms::LAYER, p.layer)?;
    program.set_uniform(backend, uniforms::SINE_INTENSITY, p.sine_intensity)?;
    Ok(())
}

/// Drives one program over a list of drawables and keeps the animation clock.
///
/// The clock is the number of `render` calls so far, not wall time: three
/// calls per tick advance it by three.
#[derive(Debug)]
pub struct Renderer {
    frame_count: u64,
    clear_color: [f32; 4],
}

impl Renderer {
    pub fn new(clear_color: [f32; 4]) -> Self {
        Self {
            frame_count: 0,
            clear_color,
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn clear_color(&self) -> [f32; 4] {
        self.clear_color
    }

    pub fn set_clear_color(&mut self, color: [f32; 4]) {
        self.clear_color = color;
    }

    /// Clear the render target. Called once per tick before any `render`.
    pub fn clear<B: ShaderBackend + ?Sized>(&self, backend: &mut B) {
        backend.set_clear_color(self.clear_color);
        backend.clear();
    }

    /// Animation time for the current call.
    ///
    /// Computed in f64 so the clock keeps moving past 2^24 calls; the result
    /// still steps at f32 precision once uploaded.
    pub fn time(&self, time_scale: f32) -> f32 {
        (self.frame_count as f64 * time_scale as f64 / NOMINAL_FRAME_RATE as f64) as f32
    }

    pub fn render<B: ShaderBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        camera: &Camera,
        program: &mut ShaderProgram,
        params: &AnimationParams,
        drawables: &mut [&mut dyn Drawable],
    ) -> Result<(), RenderError> {
        program.use_program(backend)?;

        let view = camera.view_matrix();
        let view_proj = camera.projection_matrix() * view;
        let time = self.time(params.time_scale);
        upload_globals(backend, program, view_proj, time, params)?;

        for drawable in drawables.iter_mut() {
            let model = drawable.transform();
            program.set_uniform(backend, uniforms::MODEL, model)?;
            program.set_uniform(backend, uniforms::MODEL_VIEW, view * model)?;
            program.set_uniform(
                backend,
                uniforms::MODEL_INV_TR,
                model.transpose().inverse(),
            )?;
            program.draw(backend, &mut **drawable)?;
        }

        self.frame_count += 1;
        Ok(())
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(crate::constants::CLEAR_COLOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FIREBALL_INSTANCES;

    #[test]
    fn time_follows_frame_counter() {
        let mut r = Renderer::default();
        assert_eq!(r.time(1.0), 0.0);
        r.frame_count = 60;
        assert!((r.time(1.0) - 1.0).abs() < 1e-6);
        assert!((r.time(2.0) - 2.0).abs() < 1e-6);
        assert_eq!(r.time(0.0), 0.0);
    }

    #[test]
    fn time_keeps_advancing_past_f32_integer_range() {
        let mut r = Renderer::default();
        r.frame_count = 1 << 24;
        let before = r.time(1.0);
        r.frame_count += 60;
        assert!(r.time(1.0) > before);
        assert!((r.time(1.0) - before - 1.0).abs() < 0.05);
    }

    #[test]
    fn params_take_globals_from_controls_and_look_from_style() {
        let mut controls = Controls::default();
        controls.layer = 0.3;
        let style = FIREBALL_INSTANCES[2];
        let p = AnimationParams::from_controls(&controls, &style);
        assert_eq!(p.layer, 0.3);
        assert_eq!(p.color1, style.color1);
        assert_eq!(p.blend2, 1.0);
    }
}
