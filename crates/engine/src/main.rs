//! Pathsheet - compute a character's stats from JSON files.
//!
//! Usage: `pathsheet [RULES] [CHARACTER] [DATA]`, falling back to
//! `PATHSHEET_RULES_PATH`, `PATHSHEET_CHARACTER_PATH` and
//! `PATHSHEET_DATA_PATH`. Stats are printed to stdout as JSON, logs go to
//! stderr.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pathsheet_domain::{CharacterSnapshot, RulesTable};
use pathsheet_engine::infrastructure::json_store::JsonCharacterData;
use pathsheet_engine::infrastructure::settings;
use pathsheet_engine::CharacterStatsUseCase;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root, then the working directory.
    settings::load_dotenv_from(&repo_root());
    settings::load_dotenv_from(Path::new("."));

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pathsheet_engine=debug,pathsheet_domain=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut args = std::env::args().skip(1);
    let rules_path = required_path(args.next(), "PATHSHEET_RULES_PATH")?;
    let character_path = required_path(args.next(), "PATHSHEET_CHARACTER_PATH")?;
    let data_path = args
        .next()
        .or_else(|| std::env::var("PATHSHEET_DATA_PATH").ok())
        .map(PathBuf::from);

    let rules_json = tokio::fs::read_to_string(&rules_path)
        .await
        .with_context(|| format!("reading rules table {}", rules_path.display()))?;
    let rules = RulesTable::from_json_str(&rules_json)?;
    tracing::info!(path = %rules_path.display(), entries = rules.len(), "Loaded rules table");

    let character_json = tokio::fs::read_to_string(&character_path)
        .await
        .with_context(|| format!("reading character {}", character_path.display()))?;
    let character: CharacterSnapshot = serde_json::from_str(&character_json)
        .with_context(|| format!("parsing character {}", character_path.display()))?;

    let data = match data_path {
        Some(path) => JsonCharacterData::load_or_empty(path).await?,
        None => JsonCharacterData::default(),
    };

    let use_case = CharacterStatsUseCase::new(
        Arc::new(data),
        Arc::new(rules),
        settings::settings_from_env(),
    );
    let result = use_case.execute(&character).await?;
    if result.missing_elements() > 0 {
        tracing::warn!(
            missing = result.missing_elements(),
            "Some selected elements have no rules table entry"
        );
    }

    println!("{}", serde_json::to_string_pretty(&result.stats)?);
    Ok(())
}

fn required_path(arg: Option<String>, var: &str) -> anyhow::Result<PathBuf> {
    arg.or_else(|| std::env::var(var).ok())
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .with_context(|| format!("missing path: pass it as an argument or set {var}"))
}

fn repo_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..")
}
