//! Character stats operation errors.

use crate::infrastructure::ports::PortError;
use pathsheet_domain::DomainError;

/// Errors that can occur while computing a character's stats.
#[derive(Debug, thiserror::Error)]
pub enum CharacterStatsError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Data access error: {0}")]
    DataAccess(#[from] PortError),
}
