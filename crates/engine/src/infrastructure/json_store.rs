//! JSON-backed character data.
//!
//! Serves [`CharacterDataPort`] from one document loaded up front:
//!
//! ```json
//! {
//!   "favoredClassBonuses": { "<character uuid>": [{ "className": "Rogue", "level": 1, "choice": "skill" }] },
//!   "classFeatures": { "<character uuid>": [{ "id": "cf1", "name": "Sneak Attack", "className": "Rogue", "level": 1 }] },
//!   "abpNodes": [{ "id": "armor", "name": "Armor Attunement", "category": "armor_attunement", "level": 3 }]
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

use pathsheet_domain::{
    AbpCacheData, AbpNode, CharacterId, ClassFeatureSelection, FavoredClassBonus,
};

use super::ports::{CharacterDataPort, PortError};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CharacterDataDocument {
    favored_class_bonuses: HashMap<String, Vec<FavoredClassBonus>>,
    class_features: HashMap<String, Vec<ClassFeatureSelection>>,
    abp_nodes: Vec<AbpNode>,
}

/// In-memory character data read from a JSON document.
#[derive(Debug, Clone, Default)]
pub struct JsonCharacterData {
    favored_class_bonuses: HashMap<CharacterId, Vec<FavoredClassBonus>>,
    class_features: HashMap<CharacterId, Vec<ClassFeatureSelection>>,
    abp_nodes: Vec<AbpNode>,
}

fn keyed_by_character<T>(
    section: &'static str,
    entries: HashMap<String, Vec<T>>,
) -> Result<HashMap<CharacterId, Vec<T>>, PortError> {
    entries
        .into_iter()
        .map(|(key, values)| {
            let uuid = Uuid::parse_str(key.trim()).map_err(|e| {
                PortError::serialization(format!("{section}: invalid character id '{key}': {e}"))
            })?;
            Ok((CharacterId::from_uuid(uuid), values))
        })
        .collect()
}

impl JsonCharacterData {
    pub fn from_json_str(json: &str) -> Result<Self, PortError> {
        let document: CharacterDataDocument = serde_json::from_str(json)?;
        Ok(Self {
            favored_class_bonuses: keyed_by_character(
                "favoredClassBonuses",
                document.favored_class_bonuses,
            )?,
            class_features: keyed_by_character("classFeatures", document.class_features)?,
            abp_nodes: document.abp_nodes,
        })
    }

    /// Read and parse the document at `path`.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, PortError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PortError::not_found("Character data file", path.display())
            } else {
                PortError::unavailable(
                    "load_character_data",
                    format!("{}: {e}", path.display()),
                )
            }
        })?;
        let data = Self::from_json_str(&json)?;

        tracing::info!(
            path = %path.display(),
            characters = data.character_count(),
            abp_nodes = data.abp_nodes.len(),
            "Loaded character data"
        );
        Ok(data)
    }

    /// Like [`load`](Self::load), but a missing file means no recorded data.
    pub async fn load_or_empty(path: impl AsRef<Path>) -> Result<Self, PortError> {
        let path = path.as_ref();
        match Self::load(path).await {
            Err(e) if e.is_not_found() => {
                tracing::warn!(
                    path = %path.display(),
                    "No character data file, using empty data"
                );
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Characters with any recorded favored class bonuses or class features.
    pub fn character_count(&self) -> usize {
        self.favored_class_bonuses
            .keys()
            .chain(self.class_features.keys())
            .collect::<HashSet<_>>()
            .len()
    }
}

#[async_trait]
impl CharacterDataPort for JsonCharacterData {
    async fn get_favored_class_bonuses(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<FavoredClassBonus>, PortError> {
        Ok(self
            .favored_class_bonuses
            .get(&character_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_processed_class_features(
        &self,
        character_id: CharacterId,
        level: u32,
    ) -> Result<Vec<ClassFeatureSelection>, PortError> {
        Ok(self
            .class_features
            .get(&character_id)
            .map(|features| {
                features
                    .iter()
                    .filter(|feature| feature.level <= level)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get_abp_cache_data(&self, level: u32) -> Result<AbpCacheData, PortError> {
        Ok(AbpCacheData {
            level,
            nodes: self
                .abp_nodes
                .iter()
                .filter(|node| node.level <= level)
                .cloned()
                .collect(),
        })
    }
}
