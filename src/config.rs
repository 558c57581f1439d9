use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable {0} must be set")]
    Missing(&'static str),

    #[error("Invalid {key} value: {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: Vec<u8>,
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub pool_size: u32,
    pub bcrypt_cost: u32,
    pub pdf_font_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = var("JWT_SECRET")
            .ok_or(ConfigError::Missing("JWT_SECRET"))?
            .into_bytes();

        Ok(Self {
            database_url: try_load("DATABASE_URL", "foodgram.sqlite3")?,
            jwt_secret,
            host: try_load("HOST", "0.0.0.0")?,
            port: try_load("PORT", "8080")?,
            workers: try_load("WORKERS", "1")?,
            pool_size: try_load("DB_POOL_SIZE", "8")?,
            bcrypt_cost: try_load("BCRYPT_COST", &bcrypt::DEFAULT_COST.to_string())?,
            pdf_font_path: load_font_path(var("PDF_FONT_PATH")),
        })
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");
            ConfigError::Invalid {
                key,
                message: e.to_string(),
            }
        })
}

/// The shopping list falls back to a built-in Latin-1 font, which cannot draw
/// Cyrillic or other non-Latin ingredient names.
fn load_font_path(raw: Option<String>) -> Option<PathBuf> {
    let Some(raw) = raw else {
        warn!("PDF_FONT_PATH not set, shopping lists use a built-in Latin-1 font");
        return None;
    };
    let path = PathBuf::from(raw);
    if path.is_file() {
        Some(path)
    } else {
        warn!(path = %path.display(), "PDF_FONT_PATH does not point at a file, using a built-in Latin-1 font");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_path_is_kept_only_when_the_file_exists() {
        let font = tempfile::NamedTempFile::new().unwrap();
        let existing = font.path().to_str().unwrap().to_string();

        assert_eq!(load_font_path(Some(existing)), Some(font.path().to_path_buf()));
        assert_eq!(load_font_path(Some("/no/such/DejaVuSerif.ttf".into())), None);
        assert_eq!(load_font_path(None), None);
    }
}
