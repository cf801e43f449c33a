//! Browser environment queries used by the renderer: viewport size, element rectangles and
//! pointer capture.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;
use window_manager::{DesktopViewport, PointerPosition, WindowRect};

/// Height reserved for the menu bar at the top of the screen.
pub const MENU_BAR_HEIGHT_PX: i32 = 28;
/// Height reserved for the dock at the bottom of the screen.
pub const DOCK_RESERVED_HEIGHT_PX: i32 = 84;

const FALLBACK_SCREEN_WIDTH: i32 = 1280;
const FALLBACK_SCREEN_HEIGHT: i32 = 800;

/// Viewport for a `width` × `height` browser window with the menu bar and dock carved out of the
/// work area.
pub fn viewport_for_screen(width: i32, height: i32) -> DesktopViewport {
    let width = width.max(320);
    let height = height.max(240);
    let reserved = MENU_BAR_HEIGHT_PX + DOCK_RESERVED_HEIGHT_PX;
    DesktopViewport {
        work_area: WindowRect::new(0, MENU_BAR_HEIGHT_PX, width, (height - reserved).max(120)),
        screen: WindowRect::new(0, 0, width, height),
    }
}

/// Current browser viewport; the fallback size is used outside the browser.
pub fn desktop_viewport() -> DesktopViewport {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            let width = window
                .inner_width()
                .ok()
                .and_then(|value| value.as_f64())
                .map(|value| value as i32)
                .unwrap_or(FALLBACK_SCREEN_WIDTH);
            let height = window
                .inner_height()
                .ok()
                .and_then(|value| value.as_f64())
                .map(|value| value as i32)
                .unwrap_or(FALLBACK_SCREEN_HEIGHT);
            return viewport_for_screen(width, height);
        }
    }

    viewport_for_screen(FALLBACK_SCREEN_WIDTH, FALLBACK_SCREEN_HEIGHT)
}

/// Client rectangle of the element with DOM id `id`.
#[cfg(target_arch = "wasm32")]
pub fn element_rect_by_id(id: &str) -> Option<WindowRect> {
    let document = web_sys::window().and_then(|window| window.document())?;
    let rect = document.get_element_by_id(id)?.get_bounding_client_rect();
    Some(WindowRect::new(
        rect.left().round() as i32,
        rect.top().round() as i32,
        rect.width().round() as i32,
        rect.height().round() as i32,
    ))
}

#[cfg(not(target_arch = "wasm32"))]
pub fn element_rect_by_id(_: &str) -> Option<WindowRect> {
    None
}

#[cfg(target_arch = "wasm32")]
pub fn try_set_pointer_capture(ev: &web_sys::PointerEvent) {
    if let Some(target) = ev.current_target() {
        if let Ok(element) = target.dyn_into::<web_sys::Element>() {
            let _ = element.set_pointer_capture(ev.pointer_id());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn try_set_pointer_capture(_: &web_sys::PointerEvent) {}

/// Whether `ev` starts an interaction: the primary mouse button, or the primary touch/pen
/// contact.
pub fn is_primary_press(ev: &web_sys::PointerEvent) -> bool {
    if ev.pointer_type() == "mouse" {
        ev.button() == 0
    } else {
        ev.is_primary()
    }
}

pub fn pointer_position(ev: &web_sys::PointerEvent) -> PointerPosition {
    PointerPosition::new(ev.client_x(), ev.client_y())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn work_area_excludes_menu_bar_and_dock() {
        let viewport = viewport_for_screen(1440, 900);
        assert_eq!(viewport.screen, WindowRect::new(0, 0, 1440, 900));
        assert_eq!(viewport.work_area, WindowRect::new(0, 28, 1440, 788));
    }

    #[test]
    fn tiny_screens_keep_a_usable_work_area() {
        let viewport = viewport_for_screen(100, 150);
        assert_eq!(viewport.screen, WindowRect::new(0, 0, 320, 240));
        assert_eq!(viewport.work_area.h, 128);
    }
}
