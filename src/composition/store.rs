use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::assets::catalog::AccessoryDef;
use crate::assets::color::ColorDef;
use crate::assets::decode::is_recognized_image;
use crate::assets::store::ImageBlob;
use crate::composition::model::{
    AccessoryInstance, Background, BackgroundKind, CompositionSnapshot, InstanceId,
};
use crate::foundation::core::{Vec2, clamp_scale};

/// Change notification delivered to observers after each mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreEvent {
    /// The photo slot was replaced.
    PhotoChanged,
    /// The active background (or its cached value) changed.
    BackgroundChanged(BackgroundKind),
    /// A new instance was appended.
    AccessoryAdded(InstanceId),
    /// An instance was removed.
    AccessoryRemoved(InstanceId),
    /// An instance's scale changed.
    AccessoryScaled(InstanceId),
    /// An instance's offset changed.
    AccessoryMoved(InstanceId),
    /// A drag gesture started on an instance.
    DragStarted(InstanceId),
    /// A drag gesture ended on an instance.
    DragEnded(InstanceId),
}

/// Handle returned by [`CompositionStore::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer = Box<dyn FnMut(&StoreEvent)>;

/// Single source of truth for the composition being edited.
///
/// Every mutation is synchronous; observers are notified before the mutating call returns.
/// Invalid input never produces an error, it is ignored and the state stays as it was.
pub struct CompositionStore {
    photo: Option<ImageBlob>,
    background_kind: BackgroundKind,
    background_color: ColorDef,
    background_image: Option<ImageBlob>,
    pub(crate) accessories: Vec<AccessoryInstance>,
    observers: Vec<(ObserverId, Observer)>,
    next_observer: u64,
    last_instance_id: u64,
}

impl Default for CompositionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CompositionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositionStore")
            .field("photo", &self.photo)
            .field("background_kind", &self.background_kind)
            .field("background_color", &self.background_color)
            .field("background_image", &self.background_image)
            .field("accessories", &self.accessories)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl CompositionStore {
    /// Empty composition: no photo, no background, no accessories.
    pub fn new() -> Self {
        Self {
            photo: None,
            background_kind: BackgroundKind::None,
            background_color: ColorDef::default(),
            background_image: None,
            accessories: Vec::new(),
            observers: Vec::new(),
            next_observer: 0,
            last_instance_id: 0,
        }
    }

    /// Register an observer; it sees every event emitted from now on.
    pub fn subscribe(&mut self, observer: impl FnMut(&StoreEvent) + 'static) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Drop an observer. Returns `false` when the id was unknown.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(oid, _)| *oid != id);
        self.observers.len() != before
    }

    pub(crate) fn notify(&mut self, event: StoreEvent) {
        tracing::trace!(?event, "store event");
        for (_, observer) in &mut self.observers {
            observer(&event);
        }
    }

    /// Current photo.
    pub fn photo(&self) -> Option<&ImageBlob> {
        self.photo.as_ref()
    }

    /// Replace the photo.
    pub fn set_photo(&mut self, photo: ImageBlob) {
        self.photo = Some(photo);
        self.notify(StoreEvent::PhotoChanged);
    }

    /// File-input variant of [`Self::set_photo`]. Missing, unreadable or non-image files are ignored.
    pub fn set_photo_file(&mut self, path: Option<&Path>) {
        if let Some(blob) = read_image_input(path) {
            self.set_photo(blob);
        }
    }

    /// The background currently in effect.
    pub fn background(&self) -> Background {
        match self.background_kind {
            BackgroundKind::None => Background::None,
            BackgroundKind::Color => Background::Color(self.background_color),
            BackgroundKind::Image => match &self.background_image {
                Some(blob) => Background::Image(blob.clone()),
                None => Background::None,
            },
        }
    }

    /// Last chosen color, kept even while another variant is active.
    pub fn background_color(&self) -> ColorDef {
        self.background_color
    }

    /// Last uploaded background image, kept even while another variant is active.
    pub fn background_image(&self) -> Option<&ImageBlob> {
        self.background_image.as_ref()
    }

    /// Pick a solid color and make it the active background.
    pub fn set_background_color(&mut self, color: ColorDef) {
        self.background_color = color;
        self.background_kind = BackgroundKind::Color;
        self.notify(StoreEvent::BackgroundChanged(BackgroundKind::Color));
    }

    /// Upload a background image and make it the active background.
    pub fn set_background_image(&mut self, image: ImageBlob) {
        self.background_image = Some(image);
        self.background_kind = BackgroundKind::Image;
        self.notify(StoreEvent::BackgroundChanged(BackgroundKind::Image));
    }

    /// File-input variant of [`Self::set_background_image`].
    pub fn set_background_image_file(&mut self, path: Option<&Path>) {
        if let Some(blob) = read_image_input(path) {
            self.set_background_image(blob);
        }
    }

    /// Switch to "no background". Cached color and image are kept.
    pub fn clear_background(&mut self) {
        self.select_background(BackgroundKind::None);
    }

    /// Re-activate a variant from the cached values.
    ///
    /// Selecting [`BackgroundKind::Image`] before any image was uploaded is ignored.
    pub fn select_background(&mut self, kind: BackgroundKind) {
        if kind == BackgroundKind::Image && self.background_image.is_none() {
            tracing::warn!("no background image uploaded yet; selection ignored");
            return;
        }
        if self.background_kind == kind {
            return;
        }
        self.background_kind = kind;
        self.notify(StoreEvent::BackgroundChanged(kind));
    }

    /// Placed instances in insertion order.
    pub fn accessories(&self) -> &[AccessoryInstance] {
        &self.accessories
    }

    /// Look up one instance.
    pub fn accessory(&self, id: InstanceId) -> Option<&AccessoryInstance> {
        self.accessories.iter().find(|a| a.instance_id == id)
    }

    /// Place an accessory at the preview center with scale 1.
    ///
    /// Each definition can be placed once; adding it again leaves the store untouched and returns
    /// the id of the existing instance.
    pub fn add_accessory(&mut self, def: &Arc<AccessoryDef>) -> InstanceId {
        if let Some(existing) = self.accessories.iter().find(|a| a.accessory.id == def.id) {
            return existing.instance_id;
        }
        let id = self.next_instance_id();
        self.accessories.push(AccessoryInstance::new(id, Arc::clone(def)));
        self.notify(StoreEvent::AccessoryAdded(id));
        id
    }

    /// Remove one instance; unknown ids are ignored.
    pub fn remove_accessory(&mut self, id: InstanceId) {
        let before = self.accessories.len();
        self.accessories.retain(|a| a.instance_id != id);
        if self.accessories.len() != before {
            self.notify(StoreEvent::AccessoryRemoved(id));
        }
    }

    /// Set an instance's scale, clamped into `[0.3, 2.0]`. Non-finite values are ignored.
    pub fn set_accessory_scale(&mut self, id: InstanceId, scale: f64) {
        if !scale.is_finite() {
            tracing::warn!(?id, scale, "ignoring non-finite accessory scale");
            return;
        }
        let Some(inst) = self.instance_mut(id) else {
            return;
        };
        inst.scale = clamp_scale(scale);
        self.notify(StoreEvent::AccessoryScaled(id));
    }

    /// Set an instance's offset in preview pixels.
    pub fn set_accessory_offset(&mut self, id: InstanceId, offset: Vec2) {
        let Some(inst) = self.instance_mut(id) else {
            return;
        };
        inst.offset = offset;
        self.notify(StoreEvent::AccessoryMoved(id));
    }

    /// Copy of the state a renderer needs.
    pub fn snapshot(&self) -> CompositionSnapshot {
        CompositionSnapshot {
            photo: self.photo.clone(),
            background: self.background(),
            accessories: self.accessories.clone(),
        }
    }

    pub(crate) fn instance_mut(&mut self, id: InstanceId) -> Option<&mut AccessoryInstance> {
        self.accessories.iter_mut().find(|a| a.instance_id == id)
    }

    fn next_instance_id(&mut self) -> InstanceId {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        self.last_instance_id = now_ms.max(self.last_instance_id + 1);
        InstanceId(self.last_instance_id)
    }
}

fn read_image_input(path: Option<&Path>) -> Option<ImageBlob> {
    let path = path?;
    let blob = match ImageBlob::from_path(path) {
        Ok(blob) => blob,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable file input");
            return None;
        }
    };
    if !is_recognized_image(blob.bytes()) {
        tracing::warn!(path = %path.display(), "ignoring file input that is not an image");
        return None;
    }
    Some(blob)
}

#[cfg(test)]
#[path = "../../tests/unit/composition/store.rs"]
mod tests;
