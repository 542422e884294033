use crate::App;
use diorama_core::PointerSample;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Pointer position in canvas backing pixels.
fn pointer_sample(
    ev: &web::PointerEvent,
    canvas: &web::HtmlCanvasElement,
    is_down: Option<bool>,
) -> PointerSample {
    let rect = canvas.get_bounding_client_rect();
    let x_css = ev.client_x() as f32 - rect.left() as f32;
    let y_css = ev.client_y() as f32 - rect.top() as f32;
    let (w, h) = (rect.width() as f32, rect.height() as f32);
    let scale_x = if w > 0.0 { canvas.width() as f32 / w } else { 1.0 };
    let scale_y = if h > 0.0 { canvas.height() as f32 / h } else { 1.0 };
    PointerSample {
        x: x_css * scale_x,
        y: y_css * scale_y,
        viewport_width: canvas.width() as f32,
        viewport_height: canvas.height() as f32,
        is_down,
    }
}

pub fn wire_keyboard(app: Rc<RefCell<App>>) {
    let Some(window) = web::window() else {
        return;
    };
    for (kind, pressed) in [("keydown", true), ("keyup", false)] {
        let app = app.clone();
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
                let code = ev.code();
                let handled = app.borrow_mut().diorama.handle_key(&code, pressed);
                // keep Space from scrolling the page
                if handled && code == "Space" {
                    ev.prevent_default();
                }
            }) as Box<dyn FnMut(_)>);
        let _ = window.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

pub fn wire_pointer(app: Rc<RefCell<App>>, canvas: &web::HtmlCanvasElement) {
    let wire = |kind: &str, is_down: Option<bool>| {
        let app = app.clone();
        let canvas_ev = canvas.clone();
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
                let sample = pointer_sample(&ev, &canvas_ev, is_down);
                app.borrow_mut().diorama.handle_pointer(sample);
            }) as Box<dyn FnMut(_)>);
        let _ = canvas.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        closure.forget();
    };
    wire("pointermove", None);
    wire("pointerdown", Some(true));
    wire("pointerup", Some(false));
    wire("pointercancel", Some(false));
}
