use crate::surface::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub axis: Color,
    pub grid: Color,
    pub tick_label: Color,
    pub equilibrium: Color,
    pub equilibrium_label: Color,
    pub curve: Color,
    pub operating_point: Color,
    pub title: Color,
    pub track: Color,
    pub thumb: Color,
    pub font_size: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            axis: Color::gray(0xcc),
            grid: Color::gray(0xee),
            tick_label: Color::gray(0x66),
            equilibrium: Color::rgba(100, 100, 100, 0.7),
            equilibrium_label: Color::rgba(100, 100, 100, 0.9),
            curve: Color::BLUE,
            operating_point: Color::RED,
            title: Color::BLACK,
            track: Color::gray(0xaa),
            thumb: Color::RED,
            font_size: 12.0,
        }
    }
}
