use crate::assets::store::AssetSource;
use crate::composition::model::{Background, CompositionSnapshot};
use crate::foundation::core::Canvas;
use crate::foundation::error::PfpResult;
use crate::render::compositor::{
    centered, contain_transform, cover_transform, decode_blob, load_accessories,
};
use crate::render::surface::{FrameRGBA, Surface};

/// Preview backdrop when no background is selected (`#374151`).
pub const PREVIEW_EMPTY_BACKGROUND: [u8; 4] = [0x37, 0x41, 0x51, 0xff];

/// Accessories are shown at native size, shrunk to fit inside this box.
pub const PREVIEW_ACCESSORY_MAX_PX: f64 = 300.0;

/// Render what the on-screen square preview shows at `size` pixels.
///
/// Unlike export, the preview keeps aspect ratios: the background image covers the square, the
/// photo is contained in it, and accessories are positioned directly in preview pixels.
#[tracing::instrument(skip(snapshot, assets))]
pub fn render_preview(
    snapshot: &CompositionSnapshot,
    assets: &dyn AssetSource,
    size: u32,
) -> PfpResult<FrameRGBA> {
    let canvas = Canvas::square(size);
    let mut surface = Surface::new(canvas)?;

    match &snapshot.background {
        Background::None => surface.fill(PREVIEW_EMPTY_BACKGROUND),
        Background::Color(c) => surface.fill(c.to_rgba8()),
        Background::Image(blob) => match decode_blob(blob) {
            Ok(img) => surface.draw_image(&img, cover_transform(img.width, img.height, canvas))?,
            Err(e) => {
                tracing::warn!(error = %e, "background image failed to load");
                surface.fill(PREVIEW_EMPTY_BACKGROUND);
            }
        },
    }

    if let Some(photo) = &snapshot.photo {
        match decode_blob(photo) {
            Ok(img) => {
                surface.draw_image(&img, contain_transform(img.width, img.height, canvas))?
            }
            Err(e) => tracing::warn!(error = %e, "photo failed to load"),
        }
    }

    let decoded = load_accessories(&snapshot.accessories, assets);
    for (inst, img) in snapshot.accessories.iter().zip(decoded) {
        let Ok(img) = img else {
            // Hidden in the preview, same as a broken <img>.
            continue;
        };
        let w = f64::from(img.width);
        let h = f64::from(img.height);
        let fit = (PREVIEW_ACCESSORY_MAX_PX / w)
            .min(PREVIEW_ACCESSORY_MAX_PX / h)
            .min(1.0);
        let origin = canvas.center() + inst.offset;
        surface.draw_image(&img, centered(img.width, img.height, origin, fit * inst.scale))?;
    }

    Ok(surface.finish())
}

#[cfg(test)]
#[path = "../../tests/unit/render/preview.rs"]
mod tests;
