use log::{info, warn};
use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_TOKEN_PATH: &str = ".sheetpoll_token";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub page_size: u32,
    pub token_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_base_url = var(&lookup, "SHEETPOLL_API_BASE_URL");
        if api_base_url.is_none() {
            warn!("SHEETPOLL_API_BASE_URL not set, commands that reach the backend will fail");
        }

        Self {
            api_base_url,
            page_size: try_load::<u32>(&lookup, "SHEETPOLL_PAGE_SIZE", DEFAULT_PAGE_SIZE).max(1),
            token_path: var(&lookup, "SHEETPOLL_TOKEN_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| {
                    info!("SHEETPOLL_TOKEN_PATH not set, using default: {}", DEFAULT_TOKEN_PATH);
                    PathBuf::from(DEFAULT_TOKEN_PATH)
                }),
        }
    }
}

fn var(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn try_load<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Some(raw) = var(lookup, key) else {
        info!("{} not set, using default: {}", key, default);
        return default;
    };

    raw.parse().unwrap_or_else(|e| {
        warn!("Invalid {} value {:?}: {}, using default: {}", key, raw, e, default);
        default
    })
}
