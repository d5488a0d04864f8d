mod app;
mod app_state;
mod event_handler;
mod renderer;
mod state;
mod texture;
mod update_logic;

pub mod config;
pub mod curve;
pub mod drag;
pub mod export;
pub mod params;
pub mod plot;
pub mod pointer;
pub mod raster;
pub mod scale;
pub mod slider;
pub mod surface;
pub mod theme;
pub mod view;

// Re-export the main public interface
pub use app::run;
pub use params::{DerivedOutput, ParamId, ParamRange, ParameterStore, Parameters};
pub use scale::Scale;
pub use surface::DrawSurface;
pub use view::MembraneView;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    if let Err(e) = run() {
        log::error!("{e:#}");
    }
}
