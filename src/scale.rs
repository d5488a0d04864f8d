use crate::curve::CurveSampler;
use crate::params::Parameters;

pub const MAX_X: f64 = 50.0;
pub const J_MARGIN: f64 = 1.1;
pub const J_HEADROOM: f64 = 1.2;
pub const J_RANGE_FLOOR: f64 = 1e-6;
pub const DRAG_QUANTUM: f64 = 0.1;
const QUANTA_PER_UNIT: f64 = 10.0;

/// Domain ↔ pixel mapping for one draw cycle. Computed from the primary surface and
/// handed by value to every renderer in that cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub x_scale: f64,
    pub j_scale: f64,
    pub y_offset: f64,
    pub j_range: f64,
    pub max_x: f64,
}

impl Scale {
    pub fn compute(params: &Parameters, width: f64, height: f64) -> Self {
        let max_x = MAX_X;
        let sampler = CurveSampler::new(params, max_x);

        let (min_j, max_j) = sampler
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, j)| {
                (lo.min(j), hi.max(j))
            });
        let mut j_range = (max_j * J_MARGIN).abs().max((min_j * J_MARGIN).abs()) * J_HEADROOM;
        if j_range == 0.0 {
            log::debug!("flat filtration curve, flooring j_range to {J_RANGE_FLOOR}");
            j_range = J_RANGE_FLOOR;
        }

        Self {
            x_scale: width / max_x,
            j_scale: height / (2.0 * j_range),
            y_offset: height / 2.0,
            j_range,
            max_x,
        }
    }

    pub fn pixel_x(&self, x: f64) -> f64 {
        x * self.x_scale
    }

    pub fn pixel_y(&self, j: f64) -> f64 {
        self.y_offset - j * self.j_scale
    }

    pub fn to_pixel(&self, x: f64, j: f64) -> [f32; 2] {
        [self.pixel_x(x) as f32, self.pixel_y(j) as f32]
    }

    /// Inverse of [`Scale::pixel_x`], clamped to the domain.
    pub fn domain_x(&self, pixel_x: f64) -> f64 {
        (pixel_x / self.x_scale).clamp(0.0, self.max_x)
    }

    /// Decodes a drag position into a ΔP value on the 0.1 grid.
    pub fn quantized_domain_x(&self, pixel_x: f64) -> f64 {
        let x = self.domain_x(pixel_x);
        ((x * QUANTA_PER_UNIT).round() / QUANTA_PER_UNIT).clamp(0.0, self.max_x)
    }

    /// Domain values that get a gridline and a label, every 10 units.
    pub fn x_ticks(&self) -> impl Iterator<Item = f64> + use<> {
        let count = (self.max_x / 10.0).floor() as usize;
        (0..=count).map(|i| i as f64 * 10.0)
    }

    /// J values at `i·jRange/5` for `i` in `-2..=2`.
    pub fn j_ticks(&self) -> impl Iterator<Item = f64> + use<> {
        let step = self.j_range / 5.0;
        (-2..=2).map(move |i| i as f64 * step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scale() {
        let scale = Scale::compute(&Parameters::default(), 800.0, 300.0);
        assert_eq!(scale.x_scale, 16.0);
        assert_eq!(scale.y_offset, 150.0);
        // J spans -10..40, so the range is 40 * 1.1 * 1.2.
        assert!((scale.j_range - 52.8).abs() < 1e-9);
        assert!((scale.j_scale - 300.0 / 105.6).abs() < 1e-9);
    }

    #[test]
    fn test_flat_curve_uses_floor() {
        let params = Parameters {
            pe: 0.0,
            ..Parameters::default()
        };
        let scale = Scale::compute(&params, 800.0, 300.0);
        assert_eq!(scale.j_range, J_RANGE_FLOOR);
        assert!(scale.j_scale.is_finite());
        assert_eq!(scale.pixel_y(0.0), 150.0);
    }

    #[test]
    fn test_round_trip_within_one_quantum() {
        let scale = Scale::compute(&Parameters::default(), 800.0, 300.0);
        let tolerance = DRAG_QUANTUM * scale.x_scale;
        for px in 0..=800 {
            let px = px as f64;
            let back = scale.pixel_x(scale.quantized_domain_x(px));
            assert!((back - px).abs() <= tolerance, "px {px} came back as {back}");
        }
    }

    #[test]
    fn test_inverse_clamps_to_domain() {
        let scale = Scale::compute(&Parameters::default(), 800.0, 300.0);
        assert_eq!(scale.domain_x(-40.0), 0.0);
        assert_eq!(scale.domain_x(10_000.0), MAX_X);
        assert_eq!(scale.quantized_domain_x(801.0), 50.0);
    }

    #[test]
    fn test_zero_flux_maps_to_centre_line() {
        let params = Parameters {
            delta_pi: 17.3,
            pe: 4.2,
            ..Parameters::default()
        };
        let scale = Scale::compute(&params, 800.0, 300.0);
        let j = params.flux_at(params.delta_pi);
        assert_eq!(scale.pixel_y(j), scale.y_offset);
    }

    #[test]
    fn test_tick_sets() {
        let scale = Scale::compute(&Parameters::default(), 800.0, 300.0);
        let xs: Vec<f64> = scale.x_ticks().collect();
        assert_eq!(xs, vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0]);
        let js: Vec<f64> = scale.j_ticks().collect();
        assert_eq!(js.len(), 5);
        assert_eq!(js[2], 0.0);
    }
}
