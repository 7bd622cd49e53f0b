//! Flattening a [`CompositionSnapshot`] into pixels.
//!
//! Export runs four strictly ordered stages on a 1000x1000 surface:
//!
//! 1. **Background**: image stretched corner to corner, or a solid fill, or nothing
//!    (the surface starts fully transparent).
//! 2. **Photo**: stretched corner to corner (or contained, see [`PhotoFit`]).
//! 3. **Accessories**: all images decoded as one parallel batch, then drawn in insertion order.
//! 4. **Finalize**: rasterize to premultiplied RGBA8.
//!
//! A layer whose image cannot be loaded is logged and skipped; the remaining layers still render.

use rayon::prelude::*;

use crate::assets::decode::{DecodedImage, decode_image};
use crate::assets::store::{AssetSource, ImageBlob};
use crate::composition::model::{
    AccessoryInstance, Background, CompositionSnapshot, InstanceId,
};
use crate::foundation::core::{Affine, Canvas, Point, PreviewGeometry, Vec2};
use crate::foundation::error::{PfpError, PfpResult};
use crate::render::surface::{FrameRGBA, Surface};

/// How the photo is mapped onto the export canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoFit {
    /// Stretch to exactly cover the canvas, ignoring aspect ratio.
    #[default]
    Stretch,
    /// Preserve aspect ratio and letterbox, like the on-screen preview.
    Contain,
}

/// A layer that was left out because its image could not be loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkippedLayer {
    /// The background image.
    Background,
    /// The photo.
    Photo,
    /// One accessory instance.
    Accessory(InstanceId),
}

/// Pixels plus the list of layers that were skipped on the way.
#[derive(Clone, Debug)]
pub struct Composited {
    /// Flattened image.
    pub frame: FrameRGBA,
    /// Layers that failed to load, in stage order.
    pub skipped: Vec<SkippedLayer>,
}

/// Map the full image rectangle onto the full canvas, ignoring aspect ratio.
pub fn stretch_transform(img_w: u32, img_h: u32, canvas: Canvas) -> Affine {
    Affine::scale_non_uniform(
        f64::from(canvas.width) / f64::from(img_w),
        f64::from(canvas.height) / f64::from(img_h),
    )
}

/// Largest aspect-preserving scale that keeps the image inside the canvas, centered.
pub fn contain_transform(img_w: u32, img_h: u32, canvas: Canvas) -> Affine {
    let s = (f64::from(canvas.width) / f64::from(img_w))
        .min(f64::from(canvas.height) / f64::from(img_h));
    centered(img_w, img_h, canvas.center(), s)
}

/// Smallest aspect-preserving scale that covers the canvas, centered (overflow is cropped).
pub fn cover_transform(img_w: u32, img_h: u32, canvas: Canvas) -> Affine {
    let s = (f64::from(canvas.width) / f64::from(img_w))
        .max(f64::from(canvas.height) / f64::from(img_h));
    centered(img_w, img_h, canvas.center(), s)
}

/// Export placement of one accessory image.
///
/// Translate to `canvas_center + offset * scale_ratio`, scale uniformly by
/// `reference_size / native_width * instance_scale`, and center the image on that origin.
pub fn accessory_transform(
    img_w: u32,
    img_h: u32,
    canvas: Canvas,
    offset: Vec2,
    scale_ratio: f64,
    instance_scale: f64,
) -> Affine {
    let origin = canvas.center() + offset * scale_ratio;
    let s = canvas.reference_size() / f64::from(img_w) * instance_scale;
    centered(img_w, img_h, origin, s)
}

pub(crate) fn centered(img_w: u32, img_h: u32, origin: Point, scale: f64) -> Affine {
    Affine::translate(origin.to_vec2())
        * Affine::scale(scale)
        * Affine::translate((-f64::from(img_w) / 2.0, -f64::from(img_h) / 2.0))
}

pub(crate) fn decode_blob(blob: &ImageBlob) -> PfpResult<DecodedImage> {
    decode_image(blob.bytes())
        .map_err(|e| PfpError::decode(format!("'{}': {e}", blob.label())))
}

pub(crate) fn load_accessory(
    inst: &AccessoryInstance,
    assets: &dyn AssetSource,
) -> PfpResult<DecodedImage> {
    let bytes = assets.read(&inst.accessory.image)?;
    decode_image(&bytes).map_err(|e| PfpError::decode(format!("'{}': {e}", inst.accessory.image)))
}

/// Decode every accessory as one batch. Results keep the order of `accessories`.
pub(crate) fn load_accessories(
    accessories: &[AccessoryInstance],
    assets: &dyn AssetSource,
) -> Vec<PfpResult<DecodedImage>> {
    accessories
        .par_iter()
        .map(|inst| load_accessory(inst, assets))
        .collect()
}

/// Render `snapshot` at export resolution.
///
/// The caller guarantees a photo is present; a snapshot without one renders without a photo layer.
#[tracing::instrument(skip_all, fields(accessories = snapshot.accessories.len()))]
pub fn composite_export(
    snapshot: &CompositionSnapshot,
    preview: PreviewGeometry,
    assets: &dyn AssetSource,
    canvas: Canvas,
    photo_fit: PhotoFit,
) -> PfpResult<Composited> {
    let mut surface = Surface::new(canvas)?;
    let mut skipped = Vec::new();

    tracing::debug!(kind = ?snapshot.background.kind(), "background stage");
    match &snapshot.background {
        Background::None => {}
        Background::Color(c) => surface.fill(c.to_rgba8()),
        Background::Image(blob) => match decode_blob(blob) {
            Ok(img) => {
                surface.draw_image(&img, stretch_transform(img.width, img.height, canvas))?
            }
            Err(e) => {
                tracing::warn!(error = %e, "background image failed to load; skipping layer");
                skipped.push(SkippedLayer::Background);
            }
        },
    }

    tracing::debug!("photo stage");
    if let Some(photo) = &snapshot.photo {
        match decode_blob(photo) {
            Ok(img) => {
                let tr = match photo_fit {
                    PhotoFit::Stretch => stretch_transform(img.width, img.height, canvas),
                    PhotoFit::Contain => contain_transform(img.width, img.height, canvas),
                };
                surface.draw_image(&img, tr)?;
            }
            Err(e) => {
                tracing::warn!(error = %e, "photo failed to load; skipping layer");
                skipped.push(SkippedLayer::Photo);
            }
        }
    }

    tracing::debug!("accessory stage");
    let ratio = preview.scale_ratio(canvas.width);
    let decoded = load_accessories(&snapshot.accessories, assets);
    for (inst, img) in snapshot.accessories.iter().zip(decoded) {
        match img {
            Ok(img) => {
                let tr = accessory_transform(
                    img.width,
                    img.height,
                    canvas,
                    inst.offset,
                    ratio,
                    inst.scale,
                );
                surface.draw_image(&img, tr)?;
            }
            Err(e) => {
                tracing::warn!(
                    instance = inst.instance_id.0,
                    accessory = %inst.accessory.name,
                    error = %e,
                    "accessory image failed to load; skipping layer"
                );
                skipped.push(SkippedLayer::Accessory(inst.instance_id));
            }
        }
    }

    Ok(Composited {
        frame: surface.finish(),
        skipped,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
