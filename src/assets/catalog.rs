use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::assets::store::normalize_rel_path;
use crate::foundation::error::{PfpError, PfpResult};

/// Stable identifier of an accessory definition.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct AccessoryId(pub u32);

/// A catalog entry. Immutable once loaded and shared by every instance placed from it.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AccessoryDef {
    /// Catalog-unique id.
    pub id: AccessoryId,
    /// Display name.
    pub name: String,
    /// Relative path of the full-resolution overlay image.
    pub image: String,
    /// Relative path of the picker thumbnail.
    pub thumbnail: String,
}

#[derive(serde::Deserialize)]
struct CatalogFile {
    accessories: Vec<AccessoryDef>,
}

/// The static set of accessories a user can place.
#[derive(Clone, Debug)]
pub struct AccessoryCatalog {
    entries: Vec<Arc<AccessoryDef>>,
}

impl Default for AccessoryCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AccessoryCatalog {
    /// The catalog shipped with the tool.
    pub fn builtin() -> Self {
        const BUILTIN: [(u32, &str, &str); 7] = [
            (1, "RE Hat", "re-hat"),
            (2, "RE Chain", "re-chain"),
            (3, "RE Glasses", "re-glasses"),
            (4, "RE Badge", "re-badge"),
            (5, "RE Bow Tie", "re-bowtie"),
            (6, "Christmas Hat", "christmas-hat"),
            (7, "Redacted", "redacted"),
        ];
        let entries = BUILTIN
            .iter()
            .map(|&(id, name, slug)| {
                Arc::new(AccessoryDef {
                    id: AccessoryId(id),
                    name: name.to_owned(),
                    image: format!("accessories/{slug}.png"),
                    thumbnail: format!("thumbnails/{slug}-thumb.png"),
                })
            })
            .collect();
        Self { entries }
    }

    /// Build a validated catalog from definitions, keeping their order.
    pub fn from_defs(defs: Vec<AccessoryDef>) -> PfpResult<Self> {
        let mut seen = BTreeSet::new();
        for def in &defs {
            if !seen.insert(def.id) {
                return Err(PfpError::validation(format!(
                    "duplicate accessory id {}",
                    def.id.0
                )));
            }
            if def.name.trim().is_empty() {
                return Err(PfpError::validation(format!(
                    "accessory {} has an empty name",
                    def.id.0
                )));
            }
            normalize_rel_path(&def.image)?;
            normalize_rel_path(&def.thumbnail)?;
        }
        Ok(Self {
            entries: defs.into_iter().map(Arc::new).collect(),
        })
    }

    /// Parse a JSON catalog of the form `{ "accessories": [ ... ] }`.
    pub fn from_json(json: &str) -> PfpResult<Self> {
        let file: CatalogFile =
            serde_json::from_str(json).map_err(|e| PfpError::serde(format!("catalog: {e}")))?;
        Self::from_defs(file.accessories)
    }

    /// Load a JSON catalog from disk.
    pub fn load(path: &Path) -> PfpResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read catalog '{}'", path.display()))?;
        Self::from_json(&json)
    }

    /// Look up a definition by id.
    pub fn get(&self, id: AccessoryId) -> Option<&Arc<AccessoryDef>> {
        self.entries.iter().find(|d| d.id == id)
    }

    /// All definitions in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<AccessoryDef>> {
        self.entries.iter()
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` when the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/catalog.rs"]
mod tests;
