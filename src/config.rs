use std::env;
use std::path::PathBuf;

/// Region every request is rooted at when no branch filter is given.
pub const DEFAULT_REGIONAL: &str = "MALUKU DAN PAPUA";

/// Upstream loads lag behind the calendar by this many days.
pub const DEFAULT_DATA_LAG_DAYS: i64 = 2;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub migrations_path: PathBuf,
    pub regional: String,
    pub data_lag_days: i64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: env::var("HOUSEHOLD_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("HOUSEHOLD_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(7080),
            database_path: env::var("HOUSEHOLD_DATABASE_URL")
                .map(|v| {
                    PathBuf::from(
                        v.strip_prefix("sqlite://")
                            .or_else(|| v.strip_prefix("sqlite:"))
                            .unwrap_or(&v),
                    )
                })
                .unwrap_or_else(|_| PathBuf::from("data/household.db")),
            migrations_path: env::var("HOUSEHOLD_MIGRATIONS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("migrations")),
            regional: env::var("HOUSEHOLD_REGIONAL")
                .ok()
                .map(|r| r.trim().to_uppercase())
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| DEFAULT_REGIONAL.into()),
            data_lag_days: env::var("HOUSEHOLD_DATA_LAG_DAYS")
                .ok()
                .and_then(|d| d.parse().ok())
                .filter(|d: &i64| *d >= 0)
                .unwrap_or(DEFAULT_DATA_LAG_DAYS),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
