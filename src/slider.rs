use crate::scale::Scale;
use crate::surface::{DrawSurface, StrokeStyle, TextAlign, TextStyle};
use crate::theme::Theme;

pub const THUMB_RADIUS: f32 = 10.0;

/// Horizontal offset of the thumb for a given ΔP. Uses the x mapping of the plot's
/// scale so both surfaces agree pixel for pixel.
pub fn thumb_x(scale: &Scale, delta_p: f64) -> f32 {
    scale.pixel_x(delta_p) as f32
}

pub fn render_slider(surface: &mut dyn DrawSurface, scale: &Scale, delta_p: f64, theme: &Theme) {
    let width = surface.width() as f32;
    let height = surface.height() as f32;
    let mid = height / 2.0;

    surface.clear();
    surface.line([0.0, mid], [width, mid], &StrokeStyle::solid(theme.track, 2.0));
    surface.fill_circle([thumb_x(scale, delta_p), mid], THUMB_RADIUS, theme.thumb);

    let label = TextStyle {
        color: theme.tick_label,
        size: theme.font_size,
    };
    for x in scale.x_ticks() {
        surface.fill_text(
            &format!("{x}"),
            [scale.pixel_x(x) as f32, height - 5.0],
            TextAlign::Center,
            &label,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Parameters;
    use crate::surface::DisplayList;

    #[test]
    fn test_thumb_follows_primary_scale() {
        let params = Parameters {
            delta_p: 33.3,
            ..Parameters::default()
        };
        let scale = Scale::compute(&params, 800.0, 300.0);
        let mut list = DisplayList::new(800, 40);
        render_slider(&mut list, &scale, params.delta_p, &Theme::default());

        let (center, radius, _) = list.circles().next().unwrap();
        assert_eq!(radius, THUMB_RADIUS);
        assert_eq!(center, [scale.pixel_x(33.3) as f32, 20.0]);
    }

    #[test]
    fn test_ticks_line_up_with_plot_grid() {
        let scale = Scale::compute(&Parameters::default(), 800.0, 300.0);
        let mut list = DisplayList::new(800, 40);
        render_slider(&mut list, &scale, 20.0, &Theme::default());

        let ticks: Vec<([f32; 2], String)> = list
            .texts()
            .map(|(t, pos, _)| (pos, t.to_string()))
            .collect();
        assert_eq!(ticks.len(), 6);
        assert_eq!(ticks[1], ([160.0, 35.0], "10".to_string()));
        assert_eq!(ticks[5].0[0], 800.0);
    }

    #[test]
    fn test_track_spans_surface() {
        let scale = Scale::compute(&Parameters::default(), 800.0, 300.0);
        let mut list = DisplayList::new(800, 40);
        render_slider(&mut list, &scale, 0.0, &Theme::default());
        let (track, style) = list.strokes().next().unwrap();
        assert_eq!(track.to_vec(), vec![[0.0f32, 20.0], [800.0, 20.0]]);
        assert_eq!(style.width, 2.0);
    }
}
