use wasm_bindgen::JsCast;
use web_sys as web;

pub const CANVAS_ID: &str = "fireball-canvas";
pub const OVERLAY_ID: &str = "fireball-overlay";

/// Match the canvas backing store to its CSS size times devicePixelRatio.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        if canvas.width() != w_px.max(1) {
            canvas.set_width(w_px.max(1));
        }
        if canvas.height() != h_px.max(1) {
            canvas.set_height(h_px.max(1));
        }
    }
}

pub fn canvas(document: &web::Document) -> anyhow::Result<web::HtmlCanvasElement> {
    let el = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", CANVAS_ID))?;
    el.dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))
}

/// The stats/panel readout element, if the page provides one.
pub fn overlay(document: &web::Document) -> Option<web::HtmlElement> {
    document
        .get_element_by_id(OVERLAY_ID)
        .and_then(|el| el.dyn_into::<web::HtmlElement>().ok())
}

#[inline]
pub fn set_overlay_text(overlay: Option<&web::HtmlElement>, text: &str) {
    if let Some(el) = overlay {
        el.set_inner_text(text);
    }
}
