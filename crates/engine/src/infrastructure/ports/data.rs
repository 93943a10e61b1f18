//! Character data port: lookups the orchestrator needs beyond the snapshot.

use async_trait::async_trait;
use pathsheet_domain::{AbpCacheData, CharacterId, ClassFeatureSelection, FavoredClassBonus};

use super::error::PortError;

/// Read-only access to per-character and per-level rules data.
///
/// A character with nothing recorded gets an empty list, not `NotFound`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterDataPort: Send + Sync {
    async fn get_favored_class_bonuses(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<FavoredClassBonus>, PortError>;

    /// Class features already resolved for the character at `level`.
    async fn get_processed_class_features(
        &self,
        character_id: CharacterId,
        level: u32,
    ) -> Result<Vec<ClassFeatureSelection>, PortError>;

    /// ABP nodes unlocked at `level`.
    async fn get_abp_cache_data(&self, level: u32) -> Result<AbpCacheData, PortError>;
}
