//! Use cases - User story orchestration.

pub mod character_stats;

pub use character_stats::{CharacterStatsError, CharacterStatsResult, CharacterStatsUseCase};
