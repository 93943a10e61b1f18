//! Calculation settings from the environment.
//!
//! `.env.local` then `.env` at the repo root are loaded first (neither
//! overrides variables already set). Unparseable values keep the default and
//! log a warning.

use std::path::Path;
use std::str::FromStr;

use pathsheet_domain::{CalculationSettings, SkillBonusStacking};

pub const ABP_ENABLED_VAR: &str = "PATHSHEET_ABP_ENABLED";
pub const SKILL_STACKING_VAR: &str = "PATHSHEET_SKILL_STACKING";
pub const CLASS_SKILL_BONUS_VAR: &str = "PATHSHEET_CLASS_SKILL_BONUS";

/// Load `.env.local` and `.env` from `root` when present.
pub fn load_dotenv_from(root: &Path) {
    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = root.join(filename);
        if path.exists() {
            if let Err(e) = dotenvy::from_path(&path) {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read env file");
            }
        }
    }
}

/// Settings from the process environment.
pub fn settings_from_env() -> CalculationSettings {
    settings_from_lookup(|key| std::env::var(key).ok())
}

/// Settings from any key → value lookup, defaults for anything unset.
pub fn settings_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CalculationSettings {
    let mut settings = CalculationSettings::default();

    if let Some(enabled) = parsed(&lookup, ABP_ENABLED_VAR, parse_flag) {
        settings.abp_enabled = enabled;
    }
    if let Some(stacking) = parsed(&lookup, SKILL_STACKING_VAR, SkillBonusStacking::from_str) {
        settings.skill_bonus_stacking = stacking;
    }
    if let Some(bonus) = parsed(&lookup, CLASS_SKILL_BONUS_VAR, i32::from_str) {
        settings.class_skill_bonus = bonus;
    }

    tracing::debug!(
        abp_enabled = settings.abp_enabled,
        skill_bonus_stacking = %settings.skill_bonus_stacking,
        class_skill_bonus = settings.class_skill_bonus,
        "Calculation settings loaded"
    );
    settings
}

fn parsed<T, E: std::fmt::Display>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    parse: impl Fn(&str) -> Result<T, E>,
) -> Option<T> {
    let raw = lookup(key)?;
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match parse(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, value = %raw, error = %e, "Invalid setting, using default");
            None
        }
    }
}

fn parse_flag(raw: &str) -> Result<bool, String> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("expected a boolean, got '{other}'")),
    }
}
