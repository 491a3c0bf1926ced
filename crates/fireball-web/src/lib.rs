#![cfg(target_arch = "wasm32")]
use std::cell::RefCell;
use std::rc::Rc;

use fireball_core::{Controls, FrameContext};
use fireball_gpu::WgpuBackend;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod dom;
mod events;
mod frame;
mod input;

use frame::WebApp;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("fireball-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas = dom::canvas(&document)?;
    dom::sync_canvas_backing_size(&canvas);
    let (width, height) = (canvas.width(), canvas.height());

    let instance = wgpu::Instance::default();
    let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
    let mut backend = WgpuBackend::new(&instance, surface, width, height).await?;
    let mut ctx = FrameContext::new(&mut backend, Controls::default())?;
    ctx.resize(width, height);
    log::info!("[init] {}x{} canvas ready", width, height);

    let app = Rc::new(RefCell::new(WebApp::new(
        backend,
        ctx,
        canvas.clone(),
        dom::overlay(&document),
    )));
    events::wire_keyboard(&window, app.clone());
    events::wire_pointer(&canvas, app.clone());
    app.borrow().refresh_overlay();
    frame::start_loop(app);
    Ok(())
}
