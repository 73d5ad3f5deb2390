use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use anyhow::Context;
use tracing::{info, warn};

const DEFAULT_JWT_SECRET: &str = "dev-secret-change-me";

pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub jwt_secret: String,
    pub session_days: i64,
    /// Organizer account seeded at startup when both halves are set.
    pub admin: Option<(String, String)>,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let jwt_secret = lookup("INVITE_JWT_SECRET").unwrap_or_else(|| {
            warn!("INVITE_JWT_SECRET not set, using the development secret");
            DEFAULT_JWT_SECRET.to_string()
        });

        let admin = match (lookup("INVITE_ADMIN_USERNAME"), lookup("INVITE_ADMIN_PASSWORD")) {
            (Some(user), Some(pass)) if !user.trim().is_empty() && !pass.is_empty() => Some((user, pass)),
            (None, None) => None,
            _ => {
                warn!("INVITE_ADMIN_USERNAME and INVITE_ADMIN_PASSWORD must both be set, skipping organizer seed");
                None
            }
        };

        Ok(Self {
            host: try_load(&lookup, "INVITE_HOST", "0.0.0.0")?,
            port: try_load(&lookup, "INVITE_PORT", "3000")?,
            db_path: try_load(&lookup, "INVITE_DB_PATH", "invite.db")?,
            jwt_secret,
            session_days: try_load(&lookup, "INVITE_SESSION_DAYS", "7")?,
            admin,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn try_load<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> anyhow::Result<T>
where
    T::Err: Display,
{
    let raw = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("Invalid {key} value: {raw}"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.addr(), "0.0.0.0:3000");
        assert_eq!(config.db_path, PathBuf::from("invite.db"));
        assert_eq!(config.jwt_secret, DEFAULT_JWT_SECRET);
        assert_eq!(config.session_days, 7);
        assert!(config.admin.is_none());
    }

    #[test]
    fn overrides() {
        let config = load(&[
            ("INVITE_PORT", "8080"),
            ("INVITE_SESSION_DAYS", "30"),
            ("INVITE_ADMIN_USERNAME", "organizer"),
            ("INVITE_ADMIN_PASSWORD", "hunter2"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.session_days, 30);
        assert_eq!(config.admin, Some(("organizer".into(), "hunter2".into())));
    }

    #[test]
    fn bad_port_is_an_error() {
        let err = load(&[("INVITE_PORT", "eighty")]).err().unwrap();
        assert!(format!("{:#}", err).contains("INVITE_PORT"));
    }

    #[test]
    fn half_configured_admin_is_skipped() {
        let config = load(&[("INVITE_ADMIN_USERNAME", "organizer")]).unwrap();
        assert!(config.admin.is_none());
    }
}
