use std::path::Path;

use anyhow::Context;

use crate::assets::catalog::{AccessoryCatalog, AccessoryId};
use crate::assets::color::ColorDef;
use crate::assets::store::normalize_rel_path;
use crate::composition::store::CompositionStore;
use crate::foundation::core::{PreviewGeometry, Vec2};
use crate::foundation::error::{PfpError, PfpResult};
use crate::render::compositor::PhotoFit;

/// Background as written in a composition document.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundDoc {
    /// No background.
    #[default]
    None,
    /// Solid color.
    Color(ColorDef),
    /// Image path, relative to the document.
    Image(String),
}

/// One placed accessory in a composition document.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct PlacementDoc {
    /// Catalog id of the accessory.
    pub accessory: AccessoryId,
    /// Scale factor; clamped on load.
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Offset from the preview center in preview pixels.
    #[serde(default)]
    pub offset: [f64; 2],
}

fn default_scale() -> f64 {
    1.0
}

/// JSON description of a composition, used by the command line front end.
///
/// All paths are relative to the directory holding the document.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompositionDoc {
    /// Photo path.
    #[serde(default)]
    pub photo: Option<String>,
    /// Background selection.
    #[serde(default)]
    pub background: BackgroundDoc,
    /// Rendered preview width the offsets were captured against.
    #[serde(default)]
    pub preview_size: Option<f64>,
    /// Catalog file; the built-in catalog is used when absent.
    #[serde(default)]
    pub catalog: Option<String>,
    /// Placements in stacking order.
    #[serde(default)]
    pub accessories: Vec<PlacementDoc>,
    /// How the photo is fitted on export.
    #[serde(default)]
    pub photo_fit: PhotoFit,
}

impl CompositionDoc {
    /// Parse a document from JSON text.
    pub fn from_json(json: &str) -> PfpResult<Self> {
        serde_json::from_str(json).map_err(|e| PfpError::serde(format!("composition: {e}")))
    }

    /// Read and parse a document from disk.
    pub fn load(path: &Path) -> PfpResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read composition '{}'", path.display()))?;
        Self::from_json(&json)
    }

    /// Check paths and numbers without touching the filesystem.
    pub fn validate(&self) -> PfpResult<()> {
        if let Some(p) = &self.photo {
            normalize_rel_path(p)?;
        }
        if let BackgroundDoc::Image(p) = &self.background {
            normalize_rel_path(p)?;
        }
        if let Some(p) = &self.catalog {
            normalize_rel_path(p)?;
        }
        if let Some(w) = self.preview_size
            && (!w.is_finite() || w <= 0.0)
        {
            return Err(PfpError::validation("preview_size must be finite and > 0"));
        }
        for (i, p) in self.accessories.iter().enumerate() {
            if !p.scale.is_finite() || p.offset.iter().any(|v| !v.is_finite()) {
                return Err(PfpError::validation(format!(
                    "accessories[{i}]: scale and offset must be finite"
                )));
            }
        }
        Ok(())
    }

    /// Preview geometry the offsets refer to.
    pub fn preview(&self) -> PreviewGeometry {
        PreviewGeometry {
            rendered_width: self.preview_size,
        }
    }

    /// Load the catalog this document refers to.
    pub fn catalog(&self, root: &Path) -> PfpResult<AccessoryCatalog> {
        match &self.catalog {
            Some(rel) => AccessoryCatalog::load(&root.join(normalize_rel_path(rel)?)),
            None => Ok(AccessoryCatalog::builtin()),
        }
    }

    /// Replay the document into `store` through the regular mutation API.
    ///
    /// Files that cannot be read are skipped like any other invalid file input. Unknown accessory
    /// ids are a validation error.
    pub fn apply(
        &self,
        root: &Path,
        catalog: &AccessoryCatalog,
        store: &mut CompositionStore,
    ) -> PfpResult<()> {
        self.validate()?;

        if let Some(p) = &self.photo {
            store.set_photo_file(Some(&root.join(normalize_rel_path(p)?)));
        }
        match &self.background {
            BackgroundDoc::None => store.clear_background(),
            BackgroundDoc::Color(c) => store.set_background_color(*c),
            BackgroundDoc::Image(p) => {
                store.set_background_image_file(Some(&root.join(normalize_rel_path(p)?)))
            }
        }
        for p in &self.accessories {
            let def = catalog.get(p.accessory).ok_or_else(|| {
                PfpError::validation(format!("unknown accessory id {}", p.accessory.0))
            })?;
            let id = store.add_accessory(def);
            store.set_accessory_scale(id, p.scale);
            store.set_accessory_offset(id, Vec2::new(p.offset[0], p.offset[1]));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/doc.rs"]
mod tests;
