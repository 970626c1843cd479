//! Configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults, `config.toml`,
//! `config.<env>.toml` and `APP_*` env vars into `Settings`.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::Error;

pub struct Config {
    figment: Figment,
    base: PathBuf,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_in(Path::new("."))
    }

    /// Load `config.toml` and `config.<env>.toml` from `base`, then `APP_*`
    /// variables (`__` separates nested keys, e.g. `APP_DATA__INDEX_DIR`).
    pub fn load_in(base: &Path) -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(base.join("config.toml")));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file(base.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(base.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(base.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment, base: base.to_path_buf() };
        config.validate_for_env(&env_name)?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn settings(&self) -> anyhow::Result<Settings> {
        self.figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to read settings: {}", e))
    }

    /// Resolve a configured path against the directory the config was loaded from.
    pub fn path(&self, p: &str) -> PathBuf {
        resolve_with_base(&self.base, p)
    }

    fn validate_for_env(&self, env: &str) -> anyhow::Result<()> {
        let settings = self.settings()?;
        if settings.retrieval.top_k == 0 {
            return Err(Error::InvalidConfig("retrieval.top_k must be > 0".into()).into());
        }
        if settings.embedding.batch_size == 0 {
            return Err(Error::InvalidConfig("embedding.batch_size must be > 0".into()).into());
        }
        match env {
            "prod" | "production" if settings.service.access_code.is_none() => Err(Error::InvalidConfig(
                "service.access_code is required in production".into(),
            )
            .into()),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data: DataSettings,
    pub retrieval: RetrievalSettings,
    pub embedding: EmbeddingSettings,
    pub service: ServiceSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub matches_csv: String,
    pub index_dir: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self { matches_csv: "data/atp_matches.csv".to_string(), index_dir: "data/index".to_string() }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Number of chunks returned when the caller does not ask for a count.
    pub top_k: usize,
    /// Candidate pools at or below this size are returned unranked.
    pub rank_threshold: usize,
    /// Reciprocal-rank-fusion constant.
    pub rrf_k: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { top_k: 15, rank_threshold: 50, rrf_k: 60 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub model_dir: Option<String>,
    pub batch_size: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self { model_dir: None, batch_size: 64 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    pub access_code: Option<String>,
    pub ollama_url: String,
    pub model: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            access_code: None,
            ollama_url: "http://localhost:11434".to_string(),
            model: "llama3.2".to_string(),
        }
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
