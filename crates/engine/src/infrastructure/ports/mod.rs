//! Port traits for infrastructure boundaries.
//!
//! The data port is the only abstraction in the engine; the rules table and
//! the character snapshot are plain values handed to the use case.

mod data;
mod error;

pub use data::CharacterDataPort;
pub use error::PortError;

#[cfg(test)]
pub use data::MockCharacterDataPort;
