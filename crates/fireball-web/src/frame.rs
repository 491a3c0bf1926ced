use std::cell::RefCell;
use std::rc::Rc;

use fireball_core::{FrameContext, PanelCommand};
use fireball_gpu::WgpuBackend;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::dom;

// Rewrite the overlay text every this many frames.
const OVERLAY_REFRESH_FRAMES: u64 = 15;

pub struct WebApp {
    pub backend: WgpuBackend,
    pub ctx: FrameContext,
    pub canvas: web::HtmlCanvasElement,
    pub overlay: Option<web::HtmlElement>,
    ticks: u64,
}

impl WebApp {
    pub fn new(
        backend: WgpuBackend,
        ctx: FrameContext,
        canvas: web::HtmlCanvasElement,
        overlay: Option<web::HtmlElement>,
    ) -> Self {
        Self {
            backend,
            ctx,
            canvas,
            overlay,
            ticks: 0,
        }
    }

    fn sync_size(&mut self) {
        dom::sync_canvas_backing_size(&self.canvas);
        let size = (self.canvas.width(), self.canvas.height());
        if size != self.backend.size() {
            self.backend.resize(size.0, size.1);
            self.ctx.resize(size.0, size.1);
        }
    }

    pub fn refresh_overlay(&self) {
        dom::set_overlay_text(self.overlay.as_ref(), &self.ctx.overlay_text());
    }

    pub fn command(&mut self, command: PanelCommand) {
        match self.ctx.command(&mut self.backend, command) {
            Ok(effect) => {
                log::info!("[panel] {:?}", effect);
                self.refresh_overlay();
            }
            Err(e) => log::warn!("[panel] {}", e),
        }
    }

    /// Run one tick. Returns false when the loop should stop.
    pub fn frame(&mut self) -> bool {
        self.sync_size();
        if let Err(e) = self.ctx.frame(&mut self.backend) {
            log::error!("[frame] {}", e);
        }
        self.ticks += 1;
        if self.ticks % OVERLAY_REFRESH_FRAMES == 0 {
            self.refresh_overlay();
        }
        match self.backend.present() {
            Ok(()) => true,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.backend.reconfigure();
                true
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("[gpu] out of memory; stopping");
                false
            }
            Err(e) => {
                log::warn!("[gpu] {:?}", e);
                true
            }
        }
    }
}

pub fn start_loop(app: Rc<RefCell<WebApp>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if !app.borrow_mut().frame() {
            return;
        }
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
