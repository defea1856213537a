use std::path::{Path, PathBuf};

use anyhow::Context;

use super::models::MatcherSettings;

pub const SETTINGS_PATH_ENV: &str = "RESUME_MATCHER_SETTINGS";

pub struct SettingsStore {
    file_path: PathBuf,
}

impl SettingsStore {
    pub fn new() -> Self {
        let file_path = std::env::var_os(SETTINGS_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(settings_path);
        Self::at(file_path)
    }

    pub fn at(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    pub async fn load(&self) -> anyhow::Result<MatcherSettings> {
        if !tokio::fs::try_exists(&self.file_path)
            .await
            .unwrap_or(false)
        {
            tracing::debug!(path = %self.file_path.display(), "no settings file, using defaults");
            return Ok(MatcherSettings::default());
        }

        let content = tokio::fs::read_to_string(&self.file_path)
            .await
            .with_context(|| {
                format!("failed to read settings file {}", self.file_path.display())
            })?;

        let parsed = serde_json::from_str::<MatcherSettings>(&content).with_context(|| {
            format!("invalid JSON in settings file {}", self.file_path.display())
        })?;

        Ok(parsed.sanitized())
    }

    pub async fn save(&self, settings: &MatcherSettings) -> anyhow::Result<()> {
        if let Some(parent) = self.file_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(settings)?;
        tokio::fs::write(&self.file_path, json).await?;
        tracing::info!(path = %self.file_path.display(), "settings saved");
        Ok(())
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

fn settings_path() -> PathBuf {
    app_data_root().join("settings.json")
}

pub fn app_data_root() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Ok(local_app_data) = std::env::var("LOCALAPPDATA") {
            return PathBuf::from(local_app_data).join("ResumeMatcher");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = dirs::home_dir() {
            return home
                .join("Library")
                .join("Application Support")
                .join("ResumeMatcher");
        }
    }

    if let Some(path) = dirs::data_local_dir() {
        return path.join("ResumeMatcher");
    }

    PathBuf::from(".").join("ResumeMatcher")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::VocabularyMode;

    #[tokio::test]
    async fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::at(dir.path().join("settings.json"));
        assert_eq!(store.load().await.unwrap(), MatcherSettings::default());
    }

    #[tokio::test]
    async fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::at(dir.path().join("nested").join("settings.json"));
        let settings = MatcherSettings {
            fuzzy_threshold: 80,
            vocabulary_mode: VocabularyMode::Open,
            render_charts: false,
            default_phone_region: Some("PK".to_string()),
            ..MatcherSettings::default()
        };

        store.save(&settings).await.unwrap();
        assert_eq!(store.load().await.unwrap(), settings);
    }

    #[tokio::test]
    async fn invalid_json_reports_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        tokio::fs::write(&path, "{\"fuzzyThreshold\": \"high\"}")
            .await
            .unwrap();

        let err = SettingsStore::at(&path).load().await.unwrap_err();
        assert!(err.to_string().contains("invalid JSON in settings file"));
    }

    #[test]
    fn data_root_is_app_specific() {
        assert!(app_data_root().ends_with("ResumeMatcher"));
    }
}
