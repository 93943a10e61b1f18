//! Rules table: the data contract the contributing systems read.

mod definition;
mod table;

pub use definition::{DefinitionValue, EffectDefinition};
pub use table::{normalize_name, RulesTable};
