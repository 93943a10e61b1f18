//! Pathsheet Engine library.
//!
//! Async side of the stat engine: everything that talks to the outside world
//! or sequences the pure rules in `pathsheet-domain`.
//!
//! ## Structure
//!
//! - `use_cases/` - Character stats orchestration
//! - `infrastructure/` - Data port, JSON adapter and settings loading

pub mod infrastructure;
pub mod use_cases;

pub use use_cases::{CharacterStatsError, CharacterStatsResult, CharacterStatsUseCase};
