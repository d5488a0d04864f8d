use crate::params::Parameters;
use crate::surface::Rect;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "FILTRATION_CONFIG";

/// Largest accepted width or height for either surface, in pixels.
pub const MAX_SURFACE_SIDE: u32 = 8192;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub title: String,
    pub primary: SurfaceSize,
    pub slider: SurfaceSize,
    /// Vertical space between the plot and the slider in the window.
    pub gap: u32,
    pub font_path: Option<PathBuf>,
    pub font_size: f32,
    pub initial: Parameters,
    pub snapshot_path: PathBuf,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            title: "Membrane Filtration: J = Pe(ΔP−Δπ), q = J⋅A".to_string(),
            primary: SurfaceSize {
                width: 800,
                height: 300,
            },
            slider: SurfaceSize {
                width: 800,
                height: 40,
            },
            gap: 24,
            font_path: None,
            font_size: 12.0,
            initial: Parameters::default(),
            snapshot_path: PathBuf::from("membrane.png"),
        }
    }
}

impl ViewConfig {
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(text).context("parsing view config")?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects layouts the surfaces cannot be built from: empty or oversized surfaces
    /// and gaps that push the frame past the size limit.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, size) in [("primary", self.primary), ("slider", self.slider)] {
            anyhow::ensure!(
                size.width > 0 && size.height > 0,
                "{name} surface must not be empty ({}x{})",
                size.width,
                size.height
            );
            anyhow::ensure!(
                size.width <= MAX_SURFACE_SIDE && size.height <= MAX_SURFACE_SIDE,
                "{name} surface {}x{} exceeds {MAX_SURFACE_SIDE} pixels",
                size.width,
                size.height
            );
        }
        anyhow::ensure!(
            self.gap <= MAX_SURFACE_SIDE,
            "gap {} exceeds {MAX_SURFACE_SIDE} pixels",
            self.gap
        );
        anyhow::ensure!(self.font_size > 0.0, "font size must be positive");
        Ok(())
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Reads the file named by `FILTRATION_CONFIG`, falling back to defaults when the
    /// variable is unset.
    pub fn from_env() -> anyhow::Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                let path = PathBuf::from(path);
                log::info!("loading config from {}", path.display());
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn primary_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.primary.width as f32, self.primary.height as f32)
    }

    /// Where the slider sits in window coordinates, below the plot.
    pub fn slider_rect(&self) -> Rect {
        Rect::new(
            0.0,
            (self.primary.height + self.gap) as f32,
            self.slider.width as f32,
            self.slider.height as f32,
        )
    }

    pub fn frame_size(&self) -> SurfaceSize {
        SurfaceSize {
            width: self.primary.width.max(self.slider.width),
            height: self.primary.height + self.gap + self.slider.height,
        }
    }
}
