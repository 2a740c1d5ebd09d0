use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::context::GuidanceDocuments;
use crate::insight::ProviderConfig;
use crate::repurpose::BatchSettings;
use crate::scoring::ScoreWeights;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSection {
    pub weights: ScoreWeights,
    /// Follower count used for performance estimates when a request has none.
    pub follower_count: u64,
}

impl Default for ScoringSection {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            follower_count: 1_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentsSection {
    /// Directory holding the guidance documents.
    pub root: PathBuf,
    #[serde(flatten)]
    pub files: GuidanceDocuments,
}

impl Default for DocumentsSection {
    fn default() -> Self {
        Self {
            root: PathBuf::from("guidance"),
            files: GuidanceDocuments::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub scoring: ScoringSection,
    pub documents: DocumentsSection,
    pub batch: BatchSettings,
    pub provider: ProviderConfig,
}

impl EngineConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>), String> {
        let config_path = path.or_else(default_config_path);
        let mut config = if let Some(path) = config_path.as_ref() {
            if path.exists() {
                let contents = std::fs::read_to_string(path)
                    .map_err(|err| format!("failed to read config: {}", err))?;
                toml::from_str(&contents)
                    .map_err(|err| format!("failed to parse config: {}", err))?
            } else {
                EngineConfig::default()
            }
        } else {
            EngineConfig::default()
        };

        config.apply_env_overrides();
        Ok((config, config_path))
    }

    pub fn from_toml(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|err| format!("failed to parse config: {}", err))
    }

    pub fn write(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| format!("failed to create config dir: {}", err))?;
        }
        let payload = toml::to_string_pretty(self)
            .map_err(|err| format!("failed to serialize config: {}", err))?;
        std::fs::write(path, payload)
            .map_err(|err| format!("failed to write config: {}", err))?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Some(dir) = env_string("GUIDANCE_DIR") {
            self.documents.root = PathBuf::from(dir);
        }
        if let Some(provider) = env_string("AI_PROVIDER") {
            self.provider.provider = Some(provider);
        }
        if let Some(api_key) = env_string("AI_API_KEY") {
            self.provider.api_key = Some(api_key);
        }
        if let Some(base_url) = env_string("AI_BASE_URL") {
            self.provider.base_url = Some(base_url);
        }
        if let Some(model) = env_string("AI_MODEL") {
            self.provider.model = Some(model);
        }
        if let Some(value) = env_parse::<usize>("BATCH_SIZE") {
            self.batch.size = value.max(1);
        }
        if let Some(value) = env_parse::<u64>("BATCH_PACING_MS") {
            self.batch.pacing_ms = value;
        }
        if let Some(value) = env_parse::<u64>("ITEM_TIMEOUT_MS") {
            self.batch.item_timeout_ms = value;
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env_string(key).and_then(|value| value.trim().parse::<T>().ok())
}

fn default_config_path() -> Option<PathBuf> {
    env::var("CONTENT_INTEL_CONFIG")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/engine.toml")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_tables_keep_defaults() {
        let config = EngineConfig::from_toml(
            "[batch]\nsize = 5\n\n[documents]\nroot = \"docs\"\nbrand_voice = \"voice.md\"\n",
        )
        .unwrap();
        assert_eq!(config.batch.size, 5);
        assert_eq!(config.batch.item_timeout_ms, 3_000);
        assert_eq!(config.documents.root, PathBuf::from("docs"));
        assert_eq!(config.documents.files.brand_voice, "voice.md");
        assert_eq!(config.documents.files.customer_avatar, "customer-avatar.md");
        assert!(config.scoring.weights.is_normalized());
        assert_eq!(config.provider.provider, None);
    }

    #[test]
    fn written_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("engine.toml");
        let mut config = EngineConfig::default();
        config.scoring.follower_count = 4_200;
        config.write(&path).unwrap();

        let (loaded, loaded_from) = EngineConfig::load(Some(path.clone())).unwrap();
        assert_eq!(loaded_from, Some(path));
        assert_eq!(loaded.scoring, config.scoring);
        assert_eq!(loaded.documents.files, config.documents.files);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (loaded, _) = EngineConfig::load(Some(dir.path().join("absent.toml"))).unwrap();
        assert_eq!(loaded.scoring, ScoringSection::default());
    }
}
