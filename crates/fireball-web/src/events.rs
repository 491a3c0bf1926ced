use std::cell::RefCell;
use std::rc::Rc;

use fireball_core::command_for_key;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::frame::WebApp;
use crate::input::{canvas_px, wheel_lines};

fn listen<E: wasm_bindgen::convert::FromWasmAbi + 'static>(
    target: &web::EventTarget,
    kind: &str,
    handler: impl FnMut(E) + 'static,
) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    if target
        .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
        .is_err()
    {
        log::warn!("[events] could not listen for {}", kind);
    }
    closure.forget();
}

pub fn wire_keyboard(window: &web::Window, app: Rc<RefCell<WebApp>>) {
    listen(window, "keydown", move |ev: web::KeyboardEvent| {
        let Some(command) = command_for_key(&ev.key(), ev.shift_key()) else {
            return;
        };
        ev.prevent_default();
        app.borrow_mut().command(command);
    });
}

pub fn wire_pointer(canvas: &web::HtmlCanvasElement, app: Rc<RefCell<WebApp>>) {
    {
        let app = app.clone();
        let c = canvas.clone();
        listen(canvas, "mousedown", move |ev: web::MouseEvent| {
            let (x, y) = canvas_px(&ev, &c);
            app.borrow_mut().ctx.orbit.pointer_down(x, y);
        });
    }
    {
        let app = app.clone();
        let c = canvas.clone();
        listen(canvas, "mousemove", move |ev: web::MouseEvent| {
            let (x, y) = canvas_px(&ev, &c);
            let mut a = app.borrow_mut();
            let ctx = &mut a.ctx;
            ctx.orbit.pointer_move(&mut ctx.camera, x, y);
        });
    }
    if let Some(window) = web::window() {
        let app = app.clone();
        listen(&window, "mouseup", move |_: web::MouseEvent| {
            app.borrow_mut().ctx.orbit.pointer_up();
        });
    }
    listen(canvas, "wheel", move |ev: web::WheelEvent| {
        ev.prevent_default();
        let lines = wheel_lines(ev.delta_y(), ev.delta_mode());
        let mut a = app.borrow_mut();
        let ctx = &mut a.ctx;
        ctx.orbit.wheel(&mut ctx.camera, lines);
    });
}
