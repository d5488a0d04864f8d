use crate::config::{SurfaceSize, ViewConfig};
use crate::raster::Pixmap;
use crate::view::MembraneView;
use anyhow::Context;
use std::path::Path;

pub type PixmapView = MembraneView<Pixmap, Pixmap>;

/// Stacks both surfaces into one opaque RGBA8 frame laid out as in the window.
pub fn compose_frame(view: &PixmapView, config: &ViewConfig) -> (Vec<u8>, SurfaceSize) {
    let size = config.frame_size();
    let mut frame = vec![255u8; size.width as usize * size.height as usize * 4];
    view.primary().composite_onto(&mut frame, size.width, [0, 0]);
    let slider = config.slider_rect();
    view.slider()
        .composite_onto(&mut frame, size.width, [slider.x as u32, slider.y as u32]);
    (frame, size)
}

pub fn save_png(view: &PixmapView, config: &ViewConfig, path: &Path) -> anyhow::Result<()> {
    let (frame, size) = compose_frame(view, config);
    let image = image::RgbaImage::from_raw(size.width, size.height, frame)
        .context("frame buffer does not match its dimensions")?;
    image
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("writing snapshot {}", path.display()))?;
    log::info!("snapshot written to {} ({})", path.display(), view.readout());
    Ok(())
}
