use anyhow::Result;
use std::{fs, path::Path};
use tilecraft_sim::SessionConfig;
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config/tilecraft.toml";

/// Load a session config, falling back to defaults on errors.
pub fn load_from_path(path: &Path) -> SessionConfig {
    match fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<SessionConfig>(&contents) {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!("Failed to parse {}: {err}. Using defaults", path.display());
                SessionConfig::default()
            }
        },
        Err(err) => {
            if path != Path::new(DEFAULT_CONFIG_PATH) {
                warn!("Failed to read {}: {err}. Using defaults", path.display());
            } else if err.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to read {}: {err}. Using defaults", path.display());
            } else {
                warn!(
                    "Session config not found at {}. Using defaults",
                    path.display()
                );
            }
            SessionConfig::default()
        }
    }
}

/// Write a session config as TOML, creating parent directories.
pub fn save_to_path(config: &SessionConfig, path: &Path) -> Result<()> {
    let toml = toml::to_string_pretty(config)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, toml)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilecraft_core::{BlockKind, ItemId};

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir()
            .join("tilecraft_config_tests")
            .join(format!("{}_{name}", std::process::id()))
    }

    #[test]
    fn defaults_survive_a_round_trip() {
        let path = temp_path("round_trip.toml");
        let mut config = SessionConfig::default();
        config.world.seed = 99;
        config.world.terrain.width = 64;
        save_to_path(&config, &path).unwrap();

        let loaded = load_from_path(&path);
        assert_eq!(loaded.world.seed, 99);
        assert_eq!(loaded.world.terrain.width, 64);
        assert_eq!(loaded.hotbar, config.hotbar);
        assert_eq!(
            loaded.starting_inventory.count(ItemId::Block(BlockKind::Dirt)),
            16
        );
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let path = temp_path("partial.toml");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[world]\nseed = 5\n").unwrap();

        let loaded = load_from_path(&path);
        assert_eq!(loaded.world.seed, 5);
        assert_eq!(loaded.hotbar.len(), SessionConfig::default().hotbar.len());
    }

    #[test]
    fn shipped_config_parses() {
        let config: SessionConfig =
            toml::from_str(include_str!("../config/tilecraft.toml")).unwrap();
        assert_eq!(config.world.terrain.width, 200);
        assert_eq!(config.interaction.bonus_drops.len(), 1);
        assert_eq!(config.body.tuning.max_jumps, 2);
    }

    #[test]
    fn broken_files_fall_back_to_defaults() {
        let path = temp_path("broken.toml");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "world = [[[").unwrap();
        assert_eq!(load_from_path(&path).world.seed, 42);
        assert_eq!(load_from_path(&temp_path("missing.toml")).world.seed, 42);
    }
}
