//! pfpkit composes profile pictures.
//!
//! A composition is a photo, one background (none, a solid color or an uploaded image) and a set
//! of decorative accessory overlays that the user drags and scales over a live preview. Export
//! flattens the layers onto a fixed 1000x1000 canvas and delivers a PNG under a fixed file name.
//!
//! - Build state in a [`CompositionStore`] (directly, or from a [`CompositionDoc`])
//! - Drive accessory drags with [`PointerInput`] events
//! - Render the on-screen view with [`render_preview`]
//! - Export through an [`Exporter`] into a [`DownloadSink`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod audio;
mod composition;
mod encode;
mod foundation;
mod render;

pub use crate::foundation::core::{
    Affine, Canvas, EXPORT_CANVAS_SIZE, MAX_ACCESSORY_SCALE, MIN_ACCESSORY_SCALE, Point,
    PreviewGeometry, REFERENCE_FRACTION, Rect, Rgba8Premul, Vec2, clamp_scale,
};
pub use crate::foundation::error::{
    EXPORT_FAILED_MESSAGE, MISSING_PHOTO_MESSAGE, PfpError, PfpResult,
};

pub use crate::assets::catalog::{AccessoryCatalog, AccessoryDef, AccessoryId};
pub use crate::assets::color::ColorDef;
pub use crate::assets::decode::{DecodedImage, decode_image, is_recognized_image};
pub use crate::assets::store::{
    AssetSource, DirAssetSource, ImageBlob, MemoryAssetSource, normalize_rel_path,
};

pub use crate::audio::ambient::{
    AMBIENT_TRACK_SOURCE, AMBIENT_TRACK_VOLUME, AmbientTrack, AudioOutput, SilentOutput,
};

pub use crate::composition::doc::{BackgroundDoc, CompositionDoc, PlacementDoc};
pub use crate::composition::drag::{DragState, PointerInput};
pub use crate::composition::model::{
    AccessoryInstance, Background, BackgroundKind, CompositionSnapshot, InstanceId,
};
pub use crate::composition::store::{CompositionStore, ObserverId, StoreEvent};

pub use crate::encode::png::encode_png;
pub use crate::encode::sink::{DownloadSink, EXPORT_FILE_NAME, FileSink, InMemorySink};

pub use crate::render::compositor::{
    Composited, PhotoFit, SkippedLayer, accessory_transform, composite_export, contain_transform,
    cover_transform, stretch_transform,
};
pub use crate::render::pipeline::{ExportOptions, ExportedPng, Exporter, export_png};
pub use crate::render::preview::{PREVIEW_ACCESSORY_MAX_PX, PREVIEW_EMPTY_BACKGROUND, render_preview};
pub use crate::render::surface::FrameRGBA;
