//! Layered configuration loading.
//!
//! Sources, highest priority first:
//! 1. Environment variables (`BEMCHECK_*`, `__` separates nested sections)
//! 2. Project-local `bemcheck.toml`
//! 3. User-global `~/.config/bemcheck/config.toml`
//! 4. Built-in defaults
//!
//! An explicit `--config FILE` replaces the two discovered files; the
//! defaults and environment layers always apply.

use std::path::{Path, PathBuf};

use anyhow::Context;
use bem_engine::EngineConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

/// Project-local configuration file name.
pub const PROJECT_CONFIG: &str = "bemcheck.toml";

/// Load the engine configuration from all sources.
///
/// Malformed *values* inside a well-formed file are repaired later by
/// `Engine::new`; this only fails on unreadable or syntactically broken
/// TOML.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<EngineConfig> {
    figment(explicit)?
        .extract()
        .context("failed to load bemcheck configuration")
}

fn figment(explicit: Option<&Path>) -> anyhow::Result<Figment> {
    let mut figment = Figment::from(Serialized::defaults(EngineConfig::default()));

    if let Some(path) = explicit {
        anyhow::ensure!(
            path.is_file(),
            "config file '{}' does not exist",
            path.display()
        );
        figment = figment.merge(Toml::file(path));
    } else {
        if let Some(global) = global_config_path() {
            if global.is_file() {
                figment = figment.merge(Toml::file(global));
            }
        }
        let local = PathBuf::from(PROJECT_CONFIG);
        if local.is_file() {
            figment = figment.merge(Toml::file(local));
        }
    }

    Ok(figment.merge(Env::prefixed("BEMCHECK_").split("__")))
}

fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("bemcheck").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bem_core::CaseStyle;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_load_without_any_files() {
        figment::Jail::expect_with(|_| {
            let config = load(None).expect("load");
            assert_eq!(config, EngineConfig::default());
            Ok(())
        });
    }

    #[test]
    fn project_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                PROJECT_CONFIG,
                "resolution_ceiling = 500\n\
                 [naming]\n\
                 case = \"pascal\"\n\
                 block_max_words = 3\n",
            )?;
            let config = load(None).expect("load");
            assert_eq!(config.resolution_ceiling, 500);
            assert_eq!(config.naming.case, CaseStyle::Pascal);
            assert_eq!(config.naming.block_max_words, 3);
            // Untouched sections keep their defaults.
            assert_eq!(config.cache_capacity, 1000);
            Ok(())
        });
    }

    #[test]
    fn env_wins_over_files() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(PROJECT_CONFIG, "resolution_ceiling = 500\n")?;
            jail.set_env("BEMCHECK_RESOLUTION_CEILING", "250");
            jail.set_env("BEMCHECK_NAMING__CASE", "snake");
            let config = load(None).expect("load");
            assert_eq!(config.resolution_ceiling, 250);
            assert_eq!(config.naming.case, CaseStyle::Snake);
            Ok(())
        });
    }

    #[test]
    fn explicit_config_replaces_discovery() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(PROJECT_CONFIG, "resolution_ceiling = 500\n")?;
            jail.create_file("other.toml", "resolution_ceiling = 77\n")?;
            let config = load(Some(Path::new("other.toml"))).expect("load");
            assert_eq!(config.resolution_ceiling, 77);
            Ok(())
        });
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        figment::Jail::expect_with(|_| {
            assert!(load(Some(Path::new("nope.toml"))).is_err());
            Ok(())
        });
    }
}
