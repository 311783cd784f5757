use anyhow::anyhow;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub dashboard_refresh_secs: u64,
    pub birthday_window_days: u32,
    pub time_zone: Tz,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = lookup("DATABASE_URL")
            .unwrap_or_else(|| "sqlite://marbet.db?mode=rwc".to_string());

        let dashboard_refresh_secs = lookup("DASHBOARD_REFRESH_SECS")
            .and_then(|raw| raw.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(30);

        let birthday_window_days = lookup("BIRTHDAY_WINDOW_DAYS")
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(7);

        let time_zone_name = lookup("APP_TIMEZONE").unwrap_or_else(|| "UTC".to_string());
        let time_zone: Tz = time_zone_name
            .parse()
            .map_err(|_| anyhow!("Invalid APP_TIMEZONE value: {}", time_zone_name))?;

        Ok(Config {
            database_url,
            dashboard_refresh_secs,
            birthday_window_days,
            time_zone,
        })
    }
}
