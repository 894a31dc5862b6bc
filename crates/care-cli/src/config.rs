use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Config {
    /// Path of the SQLite database file
    pub database_path: String,
    /// Caregiver label used when `add` is given none
    pub default_caregiver: Option<String>,
    /// Fallback tracing filter when `CARE_LOG` is unset
    pub log_level: String,
    /// Days ahead covered by `list` when no range is given
    pub upcoming_days: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: "care.db".to_string(),
            default_caregiver: None,
            log_level: "warn".to_string(),
            upcoming_days: 7,
        }
    }
}

impl Config {
    pub fn new() -> Result<Self, figment::Error> {
        Self::figment(Toml::file("care.toml")).extract()
    }

    fn figment(file: figment::providers::Data<Toml>) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(file)
            .merge(Env::prefixed("CARE_").ignore(&["log"]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        figment::Jail::expect_with(|_jail| {
            let config = Config::new()?;
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn file_then_environment() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "care.toml",
                r#"
                database_path = "family.db"
                default_caregiver = "Ana"
                upcoming_days = 14
                "#,
            )?;
            jail.set_env("CARE_UPCOMING_DAYS", "3");

            let config = Config::new()?;
            assert_eq!(config.database_path, "family.db");
            assert_eq!(config.default_caregiver.as_deref(), Some("Ana"));
            assert_eq!(config.upcoming_days, 3);
            assert_eq!(config.log_level, "warn");
            Ok(())
        });
    }
}
