use anyhow::Context;
use std::path::Path;
use turret_simulator::config::TurretConfig;
use turret_simulator::scenario;

pub fn load_config(path: Option<&Path>) -> anyhow::Result<TurretConfig> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Ok(TurretConfig::from_json(&text)?)
        }
        None => Ok(TurretConfig::default()),
    }
}

pub fn load_commands(path: &Path) -> anyhow::Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(text
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.to_string())
        .collect())
}

pub fn check_scenario(name: &str) -> anyhow::Result<()> {
    if scenario::load_safe(name).is_none() {
        anyhow::bail!(
            "Unknown scenario {:?}, expected one of {:?}",
            name,
            scenario::list()
        );
    }
    Ok(())
}
