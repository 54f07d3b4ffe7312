//! `craftmind actions` — Print the action schema sent to the reasoner.
//!
//! The output is the registry-derived definition set, exactly what `infer`
//! receives as its tool declarations.

use std::path::Path;
use std::sync::Arc;

use craftmind_actions::builtin_registry;
use craftmind_config::AppConfig;
use craftmind_world::SimWorld;

pub async fn run(config_path: &Path) -> anyhow::Result<()> {
    let config = AppConfig::load(config_path)?;

    let world = Arc::new(SimWorld::new(&config.bot.name));
    let registry = builtin_registry(world);

    let mut definitions = registry.definitions();
    definitions.sort_by(|a, b| a.name.cmp(&b.name));

    println!("{}", serde_json::to_string_pretty(&definitions)?);
    Ok(())
}
