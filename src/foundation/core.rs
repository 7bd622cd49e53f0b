use crate::foundation::error::{PfpError, PfpResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Edge length of the square export canvas, in pixels.
pub const EXPORT_CANVAS_SIZE: u32 = 1000;

/// Fraction of the canvas width a default-scale accessory occupies (800 px on the export canvas).
pub const REFERENCE_FRACTION: f64 = 0.8;

/// Smallest scale factor an accessory instance may carry.
pub const MIN_ACCESSORY_SCALE: f64 = 0.3;

/// Largest scale factor an accessory instance may carry.
pub const MAX_ACCESSORY_SCALE: f64 = 2.0;

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Square canvas with edge `size`.
    pub fn square(size: u32) -> Self {
        Self {
            width: size,
            height: size,
        }
    }

    /// The fixed export canvas.
    pub fn export() -> Self {
        Self::square(EXPORT_CANVAS_SIZE)
    }

    /// Canvas dimensions as `u16`, the range the CPU rasterizer accepts.
    pub fn dims_u16(self) -> PfpResult<(u16, u16)> {
        let w: u16 = self
            .width
            .try_into()
            .map_err(|_| PfpError::validation("canvas width exceeds u16"))?;
        let h: u16 = self
            .height
            .try_into()
            .map_err(|_| PfpError::validation("canvas height exceeds u16"))?;
        if w == 0 || h == 0 {
            return Err(PfpError::validation("canvas dimensions must be non-zero"));
        }
        Ok((w, h))
    }

    /// Center point of the canvas.
    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    /// Width a default-scale accessory is drawn at on this canvas.
    pub fn reference_size(self) -> f64 {
        f64::from(self.width) * REFERENCE_FRACTION
    }

    /// Full canvas rectangle.
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }
}

/// Rendered preview width, used to map drag offsets into export-canvas pixels.
///
/// Offsets are captured in on-screen preview pixels; the export canvas is larger, so every offset
/// is multiplied by [`PreviewGeometry::scale_ratio`] before drawing.
#[derive(Clone, Copy, Debug, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct PreviewGeometry {
    /// Rendered width of the square preview. `None` when the preview is not mounted.
    pub rendered_width: Option<f64>,
}

impl PreviewGeometry {
    /// Geometry for a preview of known pixel width.
    pub fn with_width(width: f64) -> Self {
        Self {
            rendered_width: Some(width),
        }
    }

    /// `canvas_size / preview_width`; 1.0 when the preview width is unknown or unusable.
    pub fn scale_ratio(self, canvas_size: u32) -> f64 {
        match self.rendered_width {
            Some(w) if w.is_finite() && w > 0.0 => f64::from(canvas_size) / w,
            _ => 1.0,
        }
    }
}

/// Clamp an accessory scale factor into `[MIN_ACCESSORY_SCALE, MAX_ACCESSORY_SCALE]`.
pub fn clamp_scale(scale: f64) -> f64 {
    scale.clamp(MIN_ACCESSORY_SCALE, MAX_ACCESSORY_SCALE)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
