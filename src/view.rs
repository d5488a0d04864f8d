use crate::drag::{DragController, DragState};
use crate::params::{DerivedOutput, ParamId, ParameterStore, Parameters};
use crate::plot::render_plot;
use crate::pointer::{PointerHub, Subscription};
use crate::scale::Scale;
use crate::slider::render_slider;
use crate::surface::{DrawSurface, Rect};
use crate::theme::Theme;

/// Pointer input in window coordinates, as the host receives it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Pressed([f32; 2]),
    Moved([f32; 2]),
    Released([f32; 2]),
}

/// The membrane-filtration view: parameter state, drag handling and the two surfaces
/// it keeps in sync.
///
/// Every mutation goes through [`MembraneView::redraw`] before the call returns, so the
/// surfaces always reflect the latest processed input.
pub struct MembraneView<P: DrawSurface, S: DrawSurface> {
    store: ParameterStore,
    defaults: Parameters,
    drag: DragController,
    theme: Theme,
    primary: P,
    slider: S,
    release: Option<Subscription>,
    scale: Scale,
    redraws: u64,
}

impl<P: DrawSurface, S: DrawSurface> MembraneView<P, S> {
    pub fn new(primary: P, slider: S, initial: Parameters, theme: Theme) -> Self {
        let store = ParameterStore::new(initial);
        let scale = Scale::compute(
            &store.params(),
            primary.width() as f64,
            primary.height() as f64,
        );
        let mut view = Self {
            defaults: store.params(),
            store,
            drag: DragController::new(),
            theme,
            primary,
            slider,
            release: None,
            scale,
            redraws: 0,
        };
        view.redraw();
        view
    }

    /// Registers the application-wide release listener. Calling it again while active
    /// leaves the existing registration in place.
    pub fn activate(&mut self, hub: &PointerHub) {
        if self.release.is_some() {
            return;
        }
        self.release = Some(self.drag.subscribe_release(hub));
        log::info!("membrane view activated");
    }

    pub fn deactivate(&mut self) {
        if self.release.take().is_some() {
            self.drag.release();
            log::info!("membrane view deactivated");
        }
    }

    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    pub fn params(&self) -> Parameters {
        self.store.params()
    }

    pub fn derived(&self) -> DerivedOutput {
        self.store.derived()
    }

    pub fn readout(&self) -> String {
        self.derived().readout()
    }

    /// Inputs and results on one line, for the host's status display.
    pub fn status_line(&self) -> String {
        format!("{}  |  {}", self.params().readout(), self.readout())
    }

    pub fn drag_state(&self) -> DragState {
        self.drag.state()
    }

    /// Scale used by the most recent draw cycle.
    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn redraw_count(&self) -> u64 {
        self.redraws
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn slider(&self) -> &S {
        &self.slider
    }

    pub fn slider_bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.slider.width() as f32, self.slider.height() as f32)
    }

    /// Direct control input for one parameter. Returns whether anything changed.
    pub fn set_param(&mut self, id: ParamId, value: f64) -> bool {
        let changed = self.store.set(id, value);
        if changed {
            self.redraw();
        }
        changed
    }

    pub fn nudge(&mut self, id: ParamId, steps: f64) -> bool {
        let changed = self.store.nudge(id, steps);
        if changed {
            self.redraw();
        }
        changed
    }

    pub fn reset(&mut self) {
        self.store.reset(self.defaults);
        self.redraw();
    }

    /// Press at `pos`, relative to the slider surface's origin.
    pub fn pointer_down(&mut self, pos: [f32; 2]) -> bool {
        self.drag.press(pos, self.slider_bounds())
    }

    /// Move to `pos`, relative to the slider surface's origin. While a drag is active
    /// this writes ΔP and redraws both surfaces.
    pub fn pointer_move(&mut self, pos: [f32; 2]) -> bool {
        let Some(delta_p) = self.drag.drag_to(pos[0] as f64, &self.scale) else {
            return false;
        };
        self.store.set_raw(ParamId::DeltaP, delta_p);
        self.redraw();
        true
    }

    /// Routes a window-space pointer event. Press and move are taken relative to
    /// `slider_rect`; a release goes to every listener on `hub`, wherever it lands.
    /// Returns whether the surfaces changed.
    pub fn route_pointer(&mut self, input: PointerInput, slider_rect: Rect, hub: &PointerHub) -> bool {
        match input {
            PointerInput::Pressed(pos) => {
                self.pointer_down(slider_rect.to_local(pos));
                false
            }
            PointerInput::Moved(pos) => self.pointer_move(slider_rect.to_local(pos)),
            PointerInput::Released(pos) => {
                let notified = hub.dispatch_release();
                log::debug!("release at {pos:?} notified {notified} listener(s)");
                false
            }
        }
    }

    /// Recomputes the scale once and redraws both surfaces from it.
    pub fn redraw(&mut self) {
        let params = self.store.params();
        let output = self.store.derived();
        let scale = Scale::compute(
            &params,
            self.primary.width() as f64,
            self.primary.height() as f64,
        );

        render_plot(&mut self.primary, &scale, &params, &output, &self.theme);
        render_slider(&mut self.slider, &scale, params.delta_p, &self.theme);

        self.scale = scale;
        self.redraws += 1;
        log::debug!(
            "redraw #{}: ΔP={} Δπ={} Pe={} A={} -> {}",
            self.redraws,
            params.delta_p,
            params.delta_pi,
            params.pe,
            params.area,
            output.readout()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slider::{THUMB_RADIUS, thumb_x};
    use crate::surface::DisplayList;

    fn view() -> MembraneView<DisplayList, DisplayList> {
        MembraneView::new(
            DisplayList::new(800, 300),
            DisplayList::new(800, 40),
            Parameters::default(),
            Theme::default(),
        )
    }

    fn thumb(view: &MembraneView<DisplayList, DisplayList>) -> [f32; 2] {
        view.slider()
            .circles()
            .find(|(_, r, _)| *r == THUMB_RADIUS)
            .map(|(c, _, _)| c)
            .unwrap()
    }

    #[test]
    fn test_initial_state() {
        let view = view();
        assert_eq!(view.params(), Parameters::default());
        assert_eq!(view.readout(), "J = 10.00  q = 100.00");
        assert_eq!(view.drag_state(), DragState::Idle);
        assert_eq!(view.redraw_count(), 1);
    }

    #[test]
    fn test_drag_to_pixel_400() {
        let hub = PointerHub::new();
        let mut view = view();
        view.activate(&hub);
        assert!(view.pointer_down([5.0, 20.0]));
        assert!(view.pointer_move([400.0, 20.0]));
        assert_eq!(view.params().delta_p, 25.0);
        assert_eq!(thumb(&view)[0], 400.0);
    }

    #[test]
    fn test_drag_past_edge_clamps() {
        let hub = PointerHub::new();
        let mut view = view();
        view.activate(&hub);
        view.pointer_down([5.0, 20.0]);
        view.pointer_move([950.0, 80.0]);
        assert_eq!(view.params().delta_p, 50.0);
    }

    #[test]
    fn test_release_off_surface_stops_drag() {
        let hub = PointerHub::new();
        let mut view = view();
        view.activate(&hub);
        view.pointer_down([160.0, 20.0]);
        view.pointer_move([480.0, 90.0]);
        assert_eq!(view.params().delta_p, 30.0);

        // Released somewhere else in the app; only the hub sees it.
        hub.dispatch_release();
        assert_eq!(view.drag_state(), DragState::Idle);

        let redraws = view.redraw_count();
        assert!(!view.pointer_move([80.0, 20.0]));
        assert_eq!(view.params().delta_p, 30.0);
        assert_eq!(view.redraw_count(), redraws);
    }

    #[test]
    fn test_move_while_idle_is_ignored() {
        let mut view = view();
        assert!(!view.pointer_move([100.0, 20.0]));
        assert_eq!(view.params().delta_p, 20.0);
    }

    #[test]
    fn test_press_outside_slider_does_not_drag() {
        let mut view = view();
        assert!(!view.pointer_down([100.0, 41.0]));
        assert!(!view.pointer_move([100.0, 20.0]));
    }

    #[test]
    fn test_both_surfaces_share_x_mapping() {
        let mut view = view();
        view.set_param(ParamId::DeltaPi, 17.3);
        view.set_param(ParamId::Pe, 3.4);
        let scale = view.scale();

        let marker = view
            .primary()
            .strokes()
            .find(|(_, s)| s.dash.is_some())
            .map(|(p, _)| p[0][0])
            .unwrap();
        assert_eq!(marker, scale.pixel_x(17.3) as f32);
        assert_eq!(thumb(&view)[0], thumb_x(&scale, view.params().delta_p));

        let operating = view.primary().circles().next().unwrap().0;
        assert_eq!(operating[0], thumb(&view)[0]);
    }

    #[test]
    fn test_parameter_change_redraws_both() {
        let mut view = view();
        let before = view.redraw_count();
        assert!(view.set_param(ParamId::Area, 20.0));
        assert_eq!(view.redraw_count(), before + 1);
        assert_eq!(view.readout(), "J = 10.00  q = 200.00");
        assert!(!view.set_param(ParamId::Area, 20.0));
        assert_eq!(view.redraw_count(), before + 1);
    }

    #[test]
    fn test_activate_registers_once() {
        let hub = PointerHub::new();
        let mut view = view();
        view.activate(&hub);
        view.activate(&hub);
        assert_eq!(hub.listener_count(), 1);
        view.deactivate();
        assert_eq!(hub.listener_count(), 0);
        assert!(!view.is_active());
    }

    #[test]
    fn test_dropping_view_unsubscribes() {
        let hub = PointerHub::new();
        {
            let mut view = view();
            view.activate(&hub);
            assert_eq!(hub.listener_count(), 1);
        }
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn test_reset_restores_initial_parameters() {
        let mut view = view();
        view.set_param(ParamId::Pe, 4.0);
        view.nudge(ParamId::DeltaPi, -5.0);
        view.reset();
        assert_eq!(view.params(), Parameters::default());
    }

    #[test]
    fn test_status_line_follows_drag() {
        let hub = PointerHub::new();
        let mut view = view();
        view.activate(&hub);
        assert_eq!(
            view.status_line(),
            "ΔP = 20 mmHg  Δπ = 10 mmHg  Pe = 1  A = 10 cm²  |  J = 10.00  q = 100.00"
        );
        view.pointer_down([320.0, 20.0]);
        view.pointer_move([480.0, 20.0]);
        assert_eq!(
            view.status_line(),
            "ΔP = 30 mmHg  Δπ = 10 mmHg  Pe = 1  A = 10 cm²  |  J = 20.00  q = 200.00"
        );
    }

    #[test]
    fn test_window_release_outside_slider_ends_drag() {
        let hub = PointerHub::new();
        let mut view = view();
        view.activate(&hub);
        let slider = Rect::new(0.0, 324.0, 800.0, 40.0);

        assert!(!view.route_pointer(PointerInput::Pressed([160.0, 344.0]), slider, &hub));
        assert_eq!(view.drag_state(), DragState::Dragging);
        assert!(view.route_pointer(PointerInput::Moved([480.0, 100.0]), slider, &hub));
        assert_eq!(view.params().delta_p, 30.0);

        // Over the plot, well above the slider band.
        view.route_pointer(PointerInput::Released([700.0, 50.0]), slider, &hub);
        assert_eq!(view.drag_state(), DragState::Idle);
        assert!(!view.route_pointer(PointerInput::Moved([80.0, 344.0]), slider, &hub));
        assert_eq!(view.params().delta_p, 30.0);
    }

    #[test]
    fn test_window_press_on_plot_does_not_drag() {
        let hub = PointerHub::new();
        let mut view = view();
        view.activate(&hub);
        let slider = Rect::new(0.0, 324.0, 800.0, 40.0);
        view.route_pointer(PointerInput::Pressed([320.0, 150.0]), slider, &hub);
        assert_eq!(view.drag_state(), DragState::Idle);
        assert!(!view.route_pointer(PointerInput::Moved([480.0, 344.0]), slider, &hub));
    }
}
