//! Light/dark preference shared by every screen of the process.
//!
//! Loaded once at startup, flipped from the UI and written back on exit.
//! The analysis core never sees it.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const PREFERENCES_FILE: &str = "preferences.toml";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ThemeMode {
    Light,
    #[default]
    Dark,
}

impl ThemeMode {
    pub(crate) fn label(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PreferencesFile {
    #[serde(default)]
    theme: ThemeMode,
}

#[derive(Debug)]
pub(crate) struct Preferences {
    theme: ThemeMode,
    path: Option<PathBuf>,
    dirty: bool,
}

impl Preferences {
    pub(crate) fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("verifai").join(PREFERENCES_FILE))
    }

    /// Unreadable or missing preferences fall back to the dark theme.
    pub(crate) fn init(path: Option<PathBuf>) -> Self {
        let theme = path
            .as_deref()
            .and_then(|path| match read_preferences(path) {
                Ok(file) => file,
                Err(err) => {
                    tracing::warn!(error = %format!("{err:#}"), "ignoring preferences");
                    None
                }
            })
            .map(|file| file.theme)
            .unwrap_or_default();
        tracing::debug!(theme = theme.label(), "preferences loaded");
        Self {
            theme,
            path,
            dirty: false,
        }
    }

    pub(crate) fn theme(&self) -> ThemeMode {
        self.theme
    }

    pub(crate) fn toggle(&mut self) -> ThemeMode {
        self.theme = match self.theme {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        };
        self.dirty = true;
        self.theme
    }

    pub(crate) fn persist(&mut self) -> anyhow::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let raw = toml::to_string(&PreferencesFile { theme: self.theme })?;
        std::fs::write(path, raw)
            .with_context(|| format!("failed to write preferences {}", path.display()))?;
        self.dirty = false;
        Ok(())
    }

    /// Writes pending changes. Called once when the UI shuts down.
    pub(crate) fn teardown(mut self) -> anyhow::Result<()> {
        if self.dirty {
            self.persist()?;
        }
        Ok(())
    }
}

fn read_preferences(path: &Path) -> anyhow::Result<Option<PreferencesFile>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read preferences {}", path.display()))?;
    let file = toml::from_str(&raw)
        .with_context(|| format!("failed to parse preferences {}", path.display()))?;
    Ok(Some(file))
}
