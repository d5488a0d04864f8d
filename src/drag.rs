use crate::pointer::{PointerHub, Subscription};
use crate::scale::Scale;
use crate::surface::Rect;
use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Dragging,
}

/// Turns pointer input on the slider surface into ΔP values.
///
/// The state lives behind an `Rc` so the application-wide release listener can end a
/// drag that finished outside the slider.
#[derive(Debug, Clone)]
pub struct DragController {
    state: Rc<Cell<DragState>>,
}

impl Default for DragController {
    fn default() -> Self {
        Self {
            state: Rc::new(Cell::new(DragState::Idle)),
        }
    }
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state.get()
    }

    pub fn is_dragging(&self) -> bool {
        self.state() == DragState::Dragging
    }

    /// `pos` and `bounds` must be in the same coordinate space. Returns whether the
    /// press started a drag.
    pub fn press(&self, pos: [f32; 2], bounds: Rect) -> bool {
        if !bounds.contains(pos) {
            return false;
        }
        if !self.is_dragging() {
            log::debug!("drag started at {:?}", pos);
        }
        self.state.set(DragState::Dragging);
        true
    }

    /// Decodes a move event at `local_x`, measured from the slider's left edge. Returns
    /// the new ΔP, or `None` when no drag is active.
    pub fn drag_to(&self, local_x: f64, scale: &Scale) -> Option<f64> {
        match self.state() {
            DragState::Idle => None,
            DragState::Dragging => Some(scale.quantized_domain_x(local_x)),
        }
    }

    pub fn release(&self) {
        if self.is_dragging() {
            log::debug!("drag released");
        }
        self.state.set(DragState::Idle);
    }

    /// Registers the release listener that ends a drag from anywhere in the app.
    pub fn subscribe_release(&self, hub: &PointerHub) -> Subscription {
        let controller = self.clone();
        hub.on_release(move || controller.release())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Parameters;

    fn slider_scale() -> Scale {
        Scale::compute(&Parameters::default(), 800.0, 300.0)
    }

    #[test]
    fn test_press_outside_stays_idle() {
        let drag = DragController::new();
        assert!(!drag.press([400.0, 60.0], Rect::new(0.0, 0.0, 800.0, 40.0)));
        assert_eq!(drag.state(), DragState::Idle);
        assert_eq!(drag.drag_to(400.0, &slider_scale()), None);
    }

    #[test]
    fn test_drag_to_middle() {
        let drag = DragController::new();
        assert!(drag.press([10.0, 20.0], Rect::new(0.0, 0.0, 800.0, 40.0)));
        assert_eq!(drag.drag_to(400.0, &slider_scale()), Some(25.0));
    }

    #[test]
    fn test_drag_clamps_past_right_edge() {
        let drag = DragController::new();
        drag.press([10.0, 20.0], Rect::new(0.0, 0.0, 800.0, 40.0));
        assert_eq!(drag.drag_to(1200.0, &slider_scale()), Some(50.0));
        assert_eq!(drag.drag_to(-30.0, &slider_scale()), Some(0.0));
    }

    #[test]
    fn test_quantizes_to_tenths() {
        let drag = DragController::new();
        drag.press([10.0, 20.0], Rect::new(0.0, 0.0, 800.0, 40.0));
        // 123 px is 7.6875 in domain units.
        let value = drag.drag_to(123.0, &slider_scale()).unwrap();
        assert!((value - 7.7).abs() < 1e-9);
    }

    #[test]
    fn test_global_release_ends_drag() {
        let hub = PointerHub::new();
        let drag = DragController::new();
        let _sub = drag.subscribe_release(&hub);
        drag.press([10.0, 20.0], Rect::new(0.0, 0.0, 800.0, 40.0));
        hub.dispatch_release();
        assert_eq!(drag.state(), DragState::Idle);
        assert_eq!(drag.drag_to(100.0, &slider_scale()), None);
    }
}
