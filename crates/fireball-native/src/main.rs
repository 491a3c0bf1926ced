use std::sync::Arc;

use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{Key, NamedKey},
    window::{Window, WindowBuilder},
};

use fireball_core::{command_for_key, Controls, FrameContext};
use fireball_gpu::WgpuBackend;

const WINDOW_TITLE: &str = "Fireball";
// Refresh the overlay in the title bar this often (frames).
const TITLE_REFRESH_FRAMES: u64 = 30;

struct App {
    window: Arc<Window>,
    backend: WgpuBackend,
    ctx: FrameContext,
    shift: bool,
    cursor: (f32, f32),
    ticks: u64,
}

impl App {
    async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(Arc::clone(&window))?;
        let mut backend = WgpuBackend::new(&instance, surface, size.width, size.height).await?;
        let mut ctx = FrameContext::new(&mut backend, Controls::default())?;
        ctx.resize(size.width, size.height);
        Ok(Self {
            window,
            backend,
            ctx,
            shift: false,
            cursor: (0.0, 0.0),
            ticks: 0,
        })
    }

    fn resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        self.backend.resize(size.width, size.height);
        self.ctx.resize(size.width, size.height);
    }

    fn key(&mut self, key: &Key) {
        let name = match key {
            Key::Named(NamedKey::Tab) => "Tab",
            Key::Named(NamedKey::ArrowUp) => "ArrowUp",
            Key::Named(NamedKey::ArrowDown) => "ArrowDown",
            Key::Character(c) => c.as_str(),
            _ => return,
        };
        let Some(command) = command_for_key(name, self.shift) else {
            return;
        };
        match self.ctx.command(&mut self.backend, command) {
            Ok(effect) => {
                log::info!("[panel] {:?}", effect);
                self.refresh_title();
            }
            Err(e) => log::warn!("[panel] {}", e),
        }
    }

    fn refresh_title(&self) {
        self.window
            .set_title(&format!("{} | {}", WINDOW_TITLE, self.ctx.overlay_text()));
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        if let Err(e) = self.ctx.frame(&mut self.backend) {
            log::error!("[frame] {}", e);
        }
        self.ticks += 1;
        if self.ticks % TITLE_REFRESH_FRAMES == 0 {
            self.refresh_title();
        }
        self.backend.present()
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(WINDOW_TITLE)
            .build(&event_loop)?,
    );

    let mut app = pollster::block_on(App::new(Arc::clone(&window)))?;
    app.refresh_title();

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::Resized(size) => app.resize(size),
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::ModifiersChanged(m) => app.shift = m.state().shift_key(),
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                app.key(&event.logical_key)
            }
            WindowEvent::CursorMoved { position, .. } => {
                app.cursor = (position.x as f32, position.y as f32);
                let (x, y) = app.cursor;
                app.ctx.orbit.pointer_move(&mut app.ctx.camera, x, y);
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => app.ctx.orbit.pointer_down(app.cursor.0, app.cursor.1),
                ElementState::Released => app.ctx.orbit.pointer_up(),
            },
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / 40.0,
                };
                app.ctx.orbit.wheel(&mut app.ctx.camera, lines);
            }
            _ => {}
        },
        Event::AboutToWait => match app.render() {
            Ok(_) => app.window.request_redraw(),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => app.backend.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("[gpu] out of memory");
                elwt.exit()
            }
            Err(e) => log::warn!("[gpu] {:?}", e),
        },
        _ => {}
    })?;
    Ok(())
}
