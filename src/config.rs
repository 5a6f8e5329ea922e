use crate::locale::DisplayLocale;
use std::{env, path::PathBuf};

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub port: u16,
    pub timezone: String,
    pub locale: DisplayLocale,
    pub default_user: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let data_dir = non_empty("APP_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data"));
        let port = non_empty("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(8080);
        let timezone = non_empty("APP_TIMEZONE")
            .or_else(|| non_empty("TZ"))
            .unwrap_or_else(|| "UTC".to_string());
        let locale = non_empty("APP_LOCALE")
            .or_else(|| non_empty("LANG"))
            .map(|tag| DisplayLocale::detect(&tag))
            .unwrap_or_default();
        let default_user = non_empty("APP_DEFAULT_USER").unwrap_or_else(|| "guest".to_string());

        Self {
            data_dir,
            port,
            timezone,
            locale,
            default_user,
        }
    }
}
