use web_sys as web;

// WheelEvent.deltaMode values
pub const DOM_DELTA_PIXEL: u32 = 0;
pub const DOM_DELTA_LINE: u32 = 1;
pub const PIXELS_PER_LINE: f64 = 100.0;

/// Pointer position in canvas backing pixels.
#[inline]
pub fn canvas_px(ev: &web::MouseEvent, canvas: &web::HtmlCanvasElement) -> (f32, f32) {
    let rect = canvas.get_bounding_client_rect();
    let w = rect.width().max(1.0);
    let h = rect.height().max(1.0);
    let x = (ev.client_x() as f64 - rect.left()) / w * canvas.width() as f64;
    let y = (ev.client_y() as f64 - rect.top()) / h * canvas.height() as f64;
    (x as f32, y as f32)
}

/// Wheel delta as zoom lines; scrolling down (positive delta) zooms out.
#[inline]
pub fn wheel_lines(delta_y: f64, delta_mode: u32) -> f32 {
    let lines = match delta_mode {
        DOM_DELTA_PIXEL => delta_y / PIXELS_PER_LINE,
        DOM_DELTA_LINE => delta_y,
        // page mode
        _ => delta_y * 3.0,
    };
    -lines as f32
}
