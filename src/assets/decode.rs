use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{PfpError, PfpResult};
use crate::foundation::math::premultiply_rgba8_in_place;

const MAX_SVG_DIM: u32 = 16_384;

/// Decoded raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Decode any supported image (raster formats known to `image`, or SVG) into premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> PfpResult<DecodedImage> {
    if bytes.is_empty() {
        return Err(PfpError::decode("image data is empty"));
    }
    if looks_like_svg(bytes) {
        return rasterize_svg(bytes);
    }

    let dyn_img = image::load_from_memory(bytes)
        .context("decode image from memory")
        .map_err(|e| PfpError::decode(format!("{e:#}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(PfpError::decode("image has zero width or height"));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(DecodedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Cheap format check used to reject file input that is clearly not an image.
pub fn is_recognized_image(bytes: &[u8]) -> bool {
    !bytes.is_empty() && (image::guess_format(bytes).is_ok() || looks_like_svg(bytes))
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(1024)];
    let head = String::from_utf8_lossy(head);
    let head = head.trim_start_matches('\u{feff}').trim_start();
    head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg"))
}

fn rasterize_svg(bytes: &[u8]) -> PfpResult<DecodedImage> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts)
        .context("parse svg tree")
        .map_err(|e| PfpError::decode(format!("{e:#}")))?;

    let size = tree.size();
    let to_px = |v: f32| -> PfpResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(PfpError::decode("svg has invalid width/height"));
        }
        let px = (v.ceil() as u32).max(1);
        if px > MAX_SVG_DIM {
            return Err(PfpError::decode(format!(
                "svg raster size too large: {px} (max {MAX_SVG_DIM})"
            )));
        }
        Ok(px)
    };
    let width = to_px(size.width())?;
    let height = to_px(size.height())?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| PfpError::decode("failed to allocate svg pixmap"))?;
    let xform = resvg::tiny_skia::Transform::from_scale(
        (width as f32) / size.width(),
        (height as f32) / size.height(),
    );
    resvg::render(&tree, xform, &mut pixmap.as_mut());

    // tiny-skia pixmaps are already premultiplied.
    Ok(DecodedImage {
        width,
        height,
        rgba8_premul: Arc::new(pixmap.data().to_vec()),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
