use std::sync::atomic::{AtomicBool, Ordering};

use crate::assets::store::AssetSource;
use crate::composition::model::CompositionSnapshot;
use crate::encode::png::encode_png;
use crate::encode::sink::{DownloadSink, EXPORT_FILE_NAME};
use crate::foundation::core::{Canvas, PreviewGeometry};
use crate::foundation::error::{PfpError, PfpResult};
use crate::render::compositor::{PhotoFit, SkippedLayer, composite_export};
use crate::render::surface::FrameRGBA;

/// Export settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    /// Output canvas; 1000x1000 by default.
    pub canvas: Canvas,
    /// Photo mapping; stretch by default.
    pub photo_fit: PhotoFit,
    /// Delivered file name.
    pub file_name: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            canvas: Canvas::export(),
            photo_fit: PhotoFit::default(),
            file_name: EXPORT_FILE_NAME.to_owned(),
        }
    }
}

/// Result of one export.
#[derive(Clone, Debug)]
pub struct ExportedPng {
    /// File name the PNG is delivered under.
    pub file_name: String,
    /// Encoded PNG.
    pub png: Vec<u8>,
    /// Flattened pixels (premultiplied) the PNG was encoded from.
    pub frame: FrameRGBA,
    /// Layers left out because their images failed to load.
    pub skipped: Vec<SkippedLayer>,
}

/// Render and encode `snapshot` without delivering it.
///
/// Rejects a snapshot without a photo before any rendering happens. Image load failures skip the
/// affected layer; any other failure surfaces as [`PfpError::Export`].
#[tracing::instrument(skip_all, fields(canvas = opts.canvas.width))]
pub fn export_png(
    snapshot: &CompositionSnapshot,
    preview: PreviewGeometry,
    assets: &dyn AssetSource,
    opts: &ExportOptions,
) -> PfpResult<ExportedPng> {
    if snapshot.photo.is_none() {
        return Err(PfpError::MissingPhoto);
    }

    let run = || -> PfpResult<ExportedPng> {
        let composited =
            composite_export(snapshot, preview, assets, opts.canvas, opts.photo_fit)?;
        let png = encode_png(&composited.frame)?;
        Ok(ExportedPng {
            file_name: opts.file_name.clone(),
            png,
            frame: composited.frame,
            skipped: composited.skipped,
        })
    };

    run().map_err(|e| match e {
        PfpError::Export(_) => e,
        other => PfpError::export(other.to_string()),
    })
}

/// Runs exports one at a time and delivers the result to a [`DownloadSink`].
///
/// Starting an export while another one on the same exporter is still running is rejected with
/// [`PfpError::ExportInFlight`].
#[derive(Debug, Default)]
pub struct Exporter {
    opts: ExportOptions,
    in_flight: AtomicBool,
}

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Exporter {
    /// Exporter with the given options.
    pub fn new(opts: ExportOptions) -> Self {
        Self {
            opts,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Options in use.
    pub fn options(&self) -> &ExportOptions {
        &self.opts
    }

    /// Return `true` while an export is running; a UI disables its download control meanwhile.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn begin(&self) -> PfpResult<InFlight<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| PfpError::ExportInFlight)?;
        Ok(InFlight(&self.in_flight))
    }

    /// Export `snapshot` and deliver the PNG to `sink`.
    ///
    /// Nothing is delivered when the export fails.
    pub fn export(
        &self,
        snapshot: &CompositionSnapshot,
        preview: PreviewGeometry,
        assets: &dyn AssetSource,
        sink: &mut dyn DownloadSink,
    ) -> PfpResult<ExportedPng> {
        if snapshot.photo.is_none() {
            tracing::warn!("export rejected: no photo");
            return Err(PfpError::MissingPhoto);
        }
        let _guard = self.begin()?;

        let out = export_png(snapshot, preview, assets, &self.opts)?;
        sink.deliver(&out.file_name, &out.png)
            .map_err(|e| PfpError::export(format!("deliver '{}': {e}", out.file_name)))?;

        tracing::info!(
            file = %out.file_name,
            bytes = out.png.len(),
            skipped = out.skipped.len(),
            "export delivered"
        );
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
