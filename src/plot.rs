use crate::curve::CurveSampler;
use crate::params::{DerivedOutput, Parameters};
use crate::scale::Scale;
use crate::surface::{DrawSurface, StrokeStyle, TextAlign, TextStyle};
use crate::theme::Theme;
use std::f32::consts::FRAC_PI_2;

pub const EQUILIBRIUM_LABEL: &str = "Equilibrium (J=0)";
pub const X_AXIS_TITLE: &str = "Hydrostatic Pressure Gradient (ΔP) mmHg";
pub const Y_AXIS_TITLE: &str = "Filtration Rate (J)";
pub const OPERATING_POINT_RADIUS: f32 = 5.0;

const TICK_LABEL_DROP: f32 = 15.0;
const J_LABEL_X: f32 = 20.0;
const J_LABEL_MARGIN: f32 = 10.0;

/// Full redraw of the filtration plot. The surface is cleared first, so the output
/// depends only on the arguments.
pub fn render_plot(
    surface: &mut dyn DrawSurface,
    scale: &Scale,
    params: &Parameters,
    output: &DerivedOutput,
    theme: &Theme,
) {
    let width = surface.width() as f32;
    let height = surface.height() as f32;
    let y_offset = scale.y_offset as f32;

    surface.clear();

    let axis = StrokeStyle::solid(theme.axis, 1.0);
    surface.line([0.0, y_offset], [width, y_offset], &axis);
    surface.line([0.0, 0.0], [0.0, height], &axis);

    let grid = StrokeStyle::solid(theme.grid, 0.5);
    let tick_text = TextStyle {
        color: theme.tick_label,
        size: theme.font_size,
    };
    for x in scale.x_ticks() {
        let px = scale.pixel_x(x) as f32;
        surface.line([px, 0.0], [px, height], &grid);
        surface.fill_text(
            &format!("{x}"),
            [px, y_offset + TICK_LABEL_DROP],
            TextAlign::Center,
            &tick_text,
        );
    }

    for j in scale.j_ticks() {
        let label_y = scale.pixel_y(j) as f32;
        if (J_LABEL_MARGIN..=height - J_LABEL_MARGIN).contains(&label_y) {
            surface.fill_text(
                &format!("{j:.1}"),
                [J_LABEL_X, label_y + 4.0],
                TextAlign::Right,
                &tick_text,
            );
        }
    }

    let eq_x = scale.pixel_x(params.delta_pi) as f32;
    surface.line(
        [eq_x, 0.0],
        [eq_x, height],
        &StrokeStyle::dashed(theme.equilibrium, 1.0, 5.0, 3.0),
    );
    surface.fill_text(
        EQUILIBRIUM_LABEL,
        [eq_x, height - 10.0],
        TextAlign::Center,
        &TextStyle {
            color: theme.equilibrium_label,
            size: theme.font_size,
        },
    );

    let curve: Vec<[f32; 2]> = CurveSampler::new(params, scale.max_x)
        .iter()
        .map(|(x, j)| scale.to_pixel(x, j))
        .collect();
    surface.stroke_path(&curve, &StrokeStyle::solid(theme.curve, 2.0));

    surface.fill_circle(
        scale.to_pixel(params.delta_p, output.j),
        OPERATING_POINT_RADIUS,
        theme.operating_point,
    );

    let title = TextStyle {
        color: theme.title,
        size: theme.font_size,
    };
    surface.fill_text(X_AXIS_TITLE, [width / 2.0, height - 5.0], TextAlign::Center, &title);

    surface.save();
    surface.translate(15.0, height / 2.0);
    surface.rotate(-FRAC_PI_2);
    surface.fill_text(Y_AXIS_TITLE, [0.0, 0.0], TextAlign::Center, &title);
    surface.restore();
}
