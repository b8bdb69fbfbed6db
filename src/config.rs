use std::path::Path;

use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_CONFIG_PATH: &str = "scanjob.toml";
const ENV_PREFIX: &str = "SCANJOB_";

/// Location of the remote scan service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    pub entry_point: String,
    pub version: String,
    pub page: String,
    pub request_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            entry_point: "https://api.copyleaks.com".to_string(),
            version: "v1".to_string(),
            page: "publisher".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl ServiceConfig {
    /// `{entry_point}/{version}/{page}/{id}/{action}`
    pub fn endpoint(&self, id: &Uuid, action: &str) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            self.entry_point.trim_end_matches('/'),
            self.version,
            self.page,
            id.hyphenated(),
            action
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceConfig,
    pub poll_interval_secs: u64,
    pub verbose: bool,
    pub json_logs: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            poll_interval_secs: 5,
            verbose: false,
            json_logs: false,
        }
    }
}

impl AppConfig {
    /// Layer defaults, the TOML file at `path` (if present), `SCANJOB_*`
    /// environment variables and finally any CLI overrides.
    pub fn new<T: Serialize>(path: &Path, overrides: Option<&T>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        if let Some(overrides) = overrides {
            figment = figment.merge(Serialized::defaults(overrides));
        }

        figment
            .extract::<AppConfig>()
            .with_context(|| format!("Failed to load configuration from {}", path.display()))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to render configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[derive(Serialize)]
    struct Overrides {
        verbose: bool,
    }

    #[derive(Serialize)]
    struct PageOverride {
        service: PageOnly,
    }

    #[derive(Serialize)]
    struct PageOnly {
        page: String,
    }

    const FILE: &str = r#"
        poll_interval_secs = 2

        [service]
        page = "from-file"
    "#;

    #[test]
    fn endpoint_joins_segments() {
        let config = ServiceConfig {
            entry_point: "http://localhost:9000/".to_string(),
            ..Default::default()
        };
        let id = Uuid::parse_str("6f1f9a8e-3c7b-4b8e-9d2a-1c4e5f6a7b8c").unwrap();

        assert_eq!(
            config.endpoint(&id, "status"),
            "http://localhost:9000/v1/publisher/6f1f9a8e-3c7b-4b8e-9d2a-1c4e5f6a7b8c/status"
        );
    }

    #[test]
    fn missing_file_yields_defaults() {
        Jail::expect_with(|_jail| {
            let config = AppConfig::new(Path::new("absent.toml"), None::<&Overrides>).unwrap();
            assert_eq!(config, AppConfig::default());
            Ok(())
        });
    }

    #[test]
    fn file_values_and_overrides_are_layered() {
        Jail::expect_with(|jail| {
            jail.create_file("scanjob.toml", FILE)?;

            let config =
                AppConfig::new(Path::new("scanjob.toml"), Some(&Overrides { verbose: true }))
                    .unwrap();

            assert_eq!(config.service.page, "from-file");
            assert_eq!(config.service.version, "v1");
            assert_eq!(config.poll_interval_secs, 2);
            assert!(config.verbose);
            Ok(())
        });
    }

    #[test]
    fn env_beats_file_and_cli_beats_env() {
        Jail::expect_with(|jail| {
            jail.create_file("scanjob.toml", FILE)?;
            jail.set_env("SCANJOB_SERVICE__PAGE", "academic");
            jail.set_env("SCANJOB_POLL_INTERVAL_SECS", "9");
            jail.set_env("SCANJOB_VERBOSE", "false");

            let from_env = AppConfig::new(Path::new("scanjob.toml"), None::<&Overrides>).unwrap();
            assert_eq!(from_env.service.page, "academic");
            assert_eq!(from_env.poll_interval_secs, 9);
            assert!(!from_env.verbose);

            let defaults = ServiceConfig::default();
            assert_eq!(from_env.service.entry_point, defaults.entry_point);
            assert_eq!(from_env.service.version, defaults.version);
            assert_eq!(
                from_env.service.request_timeout_secs,
                defaults.request_timeout_secs
            );

            let with_cli =
                AppConfig::new(Path::new("scanjob.toml"), Some(&Overrides { verbose: true }))
                    .unwrap();
            assert!(with_cli.verbose);
            assert_eq!(with_cli.service.page, "academic");

            let page_cli = AppConfig::new(
                Path::new("scanjob.toml"),
                Some(&PageOverride {
                    service: PageOnly {
                        page: "cli".to_string(),
                    },
                }),
            )
            .unwrap();
            assert_eq!(page_cli.service.page, "cli");
            assert_eq!(page_cli.service.version, defaults.version);
            assert_eq!(page_cli.poll_interval_secs, 9);
            Ok(())
        });
    }

    #[test]
    fn rendered_toml_parses_back() {
        let rendered = AppConfig::default().to_toml().unwrap();
        let parsed: AppConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, AppConfig::default());
    }
}
