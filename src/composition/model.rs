use std::sync::Arc;

use crate::assets::catalog::{AccessoryDef, AccessoryId};
use crate::assets::color::ColorDef;
use crate::assets::store::ImageBlob;
use crate::composition::drag::DragState;
use crate::foundation::core::Vec2;

/// Identity of one placed accessory.
///
/// Derived from the creation time in milliseconds, bumped so ids never repeat within a store.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct InstanceId(pub u64);

/// Which background variant is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundKind {
    /// Nothing is drawn behind the photo.
    #[default]
    None,
    /// Solid color fill.
    Color,
    /// Uploaded background image.
    Image,
}

/// The active background layer.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Background {
    /// No background layer.
    #[default]
    None,
    /// Fill the whole canvas with one color.
    Color(ColorDef),
    /// Stretch an uploaded image over the whole canvas.
    Image(ImageBlob),
}

impl Background {
    /// Variant tag.
    pub fn kind(&self) -> BackgroundKind {
        match self {
            Self::None => BackgroundKind::None,
            Self::Color(_) => BackgroundKind::Color,
            Self::Image(_) => BackgroundKind::Image,
        }
    }
}

/// A placed copy of an accessory definition.
#[derive(Clone, Debug, PartialEq)]
pub struct AccessoryInstance {
    /// Unique among active instances.
    pub instance_id: InstanceId,
    /// Shared, immutable definition this instance was placed from.
    pub accessory: Arc<AccessoryDef>,
    /// Uniform scale, always within `[0.3, 2.0]`.
    pub scale: f64,
    /// Offset from the preview center, in preview pixels. Unbounded.
    pub offset: Vec2,
    /// Transient gesture state.
    pub drag: DragState,
}

impl AccessoryInstance {
    pub(crate) fn new(instance_id: InstanceId, accessory: Arc<AccessoryDef>) -> Self {
        Self {
            instance_id,
            accessory,
            scale: 1.0,
            offset: Vec2::ZERO,
            drag: DragState::Idle,
        }
    }

    /// Id of the definition this instance was placed from.
    pub fn accessory_id(&self) -> AccessoryId {
        self.accessory.id
    }

    /// Return `true` while a drag gesture is active on this instance.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }
}

/// Immutable view of the composition handed to renderers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompositionSnapshot {
    /// Current photo, if one was uploaded.
    pub photo: Option<ImageBlob>,
    /// Active background.
    pub background: Background,
    /// Instances in insertion order; later entries draw on top.
    pub accessories: Vec<AccessoryInstance>,
}
