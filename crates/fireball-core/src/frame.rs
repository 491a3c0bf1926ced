//! Per-tick frame driver shared by the native and web frontends.

use glam::Vec3;
use thiserror::Error;

use crate::backend::{ShaderBackend, ShaderStage};
use crate::camera::{Camera, OrbitControls};
use crate::constants::{InstanceStyle, CAMERA_START, CAMERA_TARGET, FIREBALL_INSTANCES};
use crate::controls::{Controls, ControlsError};
use crate::drawable::Drawable;
use crate::geometry::GeometryError;
use crate::panel::{PanelCommand, PanelEffect, ParameterPanel};
use crate::renderer::{AnimationParams, RenderError, Renderer};
use crate::scene::Scene;
use crate::shader::{ShaderError, ShaderProgram};
use crate::timer::FrameTimer;
use crate::FIREBALL_WGSL;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error(transparent)]
    Shader(#[from] ShaderError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Controls(#[from] ControlsError),
}

/// Clear, regenerate geometry if the level changed, then draw the three
/// fireballs (one `render` call each) and the floor when enabled.
pub fn draw_fireballs<B: ShaderBackend + ?Sized>(
    backend: &mut B,
    renderer: &mut Renderer,
    camera: &Camera,
    program: &mut ShaderProgram,
    scene: &mut Scene,
    controls: &Controls,
) -> Result<(), FrameError> {
    renderer.clear(backend);
    scene.reload_if_changed(backend, controls)?;

    for style in &FIREBALL_INSTANCES {
        scene.icosphere.model_mut().position = style.position;
        let params = AnimationParams::from_controls(controls, style);
        let drawable: &mut dyn Drawable = &mut scene.icosphere;
        renderer.render(backend, camera, program, &params, &mut [drawable])?;
    }

    if controls.show_floor {
        let color = Vec3::from(controls.color);
        let floor_style = InstanceStyle {
            position: scene.floor.model().position,
            color1: color,
            color2: color,
            blend1: 0.0,
            blend2: 0.0,
        };
        let params = AnimationParams::from_controls(controls, &floor_style);
        let drawable: &mut dyn Drawable = &mut scene.floor;
        renderer.render(backend, camera, program, &params, &mut [drawable])?;
    }
    Ok(())
}

/// Everything one running visualizer owns apart from the backend itself.
#[derive(Debug)]
pub struct FrameContext {
    pub camera: Camera,
    pub orbit: OrbitControls,
    pub controls: Controls,
    pub panel: ParameterPanel,
    pub renderer: Renderer,
    pub program: ShaderProgram,
    pub scene: Scene,
    pub timer: FrameTimer,
}

impl FrameContext {
    /// Link the fireball program on `backend` and load the initial scene.
    pub fn new<B: ShaderBackend + ?Sized>(
        backend: &mut B,
        controls: Controls,
    ) -> Result<Self, FrameError> {
        let program = ShaderProgram::link(
            backend,
            &[
                ShaderStage::vertex(FIREBALL_WGSL),
                ShaderStage::fragment(FIREBALL_WGSL),
            ],
        )?;
        let scene = Scene::load(&controls)?;
        Ok(Self {
            camera: Camera::new(CAMERA_START, CAMERA_TARGET),
            orbit: OrbitControls::default(),
            controls,
            panel: ParameterPanel::new(),
            renderer: Renderer::default(),
            program,
            scene,
            timer: FrameTimer::new(),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_viewport(width, height);
    }

    /// Record one tick of draws on `backend`. Presenting is up to the caller.
    pub fn frame<B: ShaderBackend + ?Sized>(&mut self, backend: &mut B) -> Result<(), FrameError> {
        self.timer.begin_frame();
        self.camera.update();
        draw_fireballs(
            backend,
            &mut self.renderer,
            &self.camera,
            &mut self.program,
            &mut self.scene,
            &self.controls,
        )
    }

    /// Apply a panel command, forcing a scene reload when asked to.
    pub fn command<B: ShaderBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        command: PanelCommand,
    ) -> Result<PanelEffect, FrameError> {
        let effect = self.panel.apply(&mut self.controls, command)?;
        if effect == PanelEffect::ReloadScene {
            self.scene.reload(backend, &self.controls)?;
        }
        Ok(effect)
    }

    pub fn overlay_text(&self) -> String {
        self.panel.overlay_text(&self.controls, &self.timer)
    }
}
