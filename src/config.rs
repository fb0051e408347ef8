use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::chrome::{ChromeEvent, Preferences, Theme};
use crate::corpus::CorpusKind;
use crate::error::{TypoError, TypoResult};
use crate::session::DEFAULT_BUDGET_SECS;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub duration_secs: u32,
    pub corpus: CorpusKind,
    pub theme: Theme,
    pub shake_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_BUDGET_SECS,
            corpus: CorpusKind::default(),
            theme: Theme::default(),
            shake_mode: false,
        }
    }
}

impl Config {
    pub fn validate(&self) -> TypoResult<()> {
        if self.duration_secs == 0 {
            return Err(TypoError::InvalidDuration(self.duration_secs));
        }
        Ok(())
    }

    pub fn preferences(&self) -> Preferences {
        Preferences {
            theme: self.theme,
            shake_mode: self.shake_mode,
        }
    }

    /// Copies only the field named by `event`, leaving the rest as stored.
    pub fn record(&mut self, event: &ChromeEvent) {
        match *event {
            ChromeEvent::ThemeChanged(theme) => self.theme = theme,
            ChromeEvent::ShakeModeChanged(on) => self.shake_mode = on,
        }
    }
}

/// Chrome observer that saves each toggle on top of the stored config.
///
/// `stored` must be the config as loaded, before command line overrides, so
/// flags given for a single run never reach the file.
pub fn persist_changes<S>(store: S, mut stored: Config) -> impl FnMut(&ChromeEvent, &Preferences)
where
    S: ConfigStore + 'static,
{
    move |event, _| {
        stored.record(event);
        if let Err(err) = store.save(&stored) {
            warn!(%err, "could not save preferences");
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> TypoResult<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "typograph") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("typograph_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    /// Missing or unreadable files fall back to the defaults.
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return Config::default(),
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "ignoring unreadable config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> TypoResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("config.json"));
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        assert_eq!(store.load(), cfg);
    }

    #[test]
    fn save_creates_missing_directories() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("nested/deeper/config.json"));
        let cfg = Config {
            duration_secs: 30,
            corpus: CorpusKind::Quotes,
            theme: Theme::Light,
            shake_mode: true,
        };
        store.save(&cfg).unwrap();
        assert_eq!(store.load(), cfg);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("absent.json"));
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn garbage_loads_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, b"{{{").unwrap();
        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, br#"{ "theme": "light" }"#).unwrap();
        let cfg = FileConfigStore::with_path(&path).load();
        assert_eq!(cfg.theme, Theme::Light);
        assert_eq!(cfg.duration_secs, 60);
        assert_eq!(cfg.corpus, CorpusKind::Classic);
    }

    #[test]
    fn zero_duration_is_invalid() {
        let cfg = Config {
            duration_secs: 0,
            ..Config::default()
        };
        assert!(matches!(cfg.validate(), Err(TypoError::InvalidDuration(0))));
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn record_touches_only_the_changed_field() {
        let mut cfg = Config::default();
        cfg.record(&ChromeEvent::ShakeModeChanged(true));
        assert!(cfg.shake_mode);
        assert_eq!(cfg.theme, Theme::Dark);

        cfg.record(&ChromeEvent::ThemeChanged(Theme::Light));
        assert_eq!(
            cfg.preferences(),
            Preferences {
                theme: Theme::Light,
                shake_mode: true,
            }
        );
    }

    #[test]
    fn persisted_toggle_keeps_one_off_overrides_out_of_the_file() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("config.json"));
        let stored = store.load();

        // this run was started with --theme light
        let running = Preferences {
            theme: Theme::Light,
            shake_mode: true,
        };
        let mut observer = persist_changes(store.clone(), stored);
        observer(&ChromeEvent::ShakeModeChanged(true), &running);

        let saved = store.load();
        assert!(saved.shake_mode);
        assert_eq!(saved.theme, Theme::Dark);
    }

    #[test]
    fn persisted_theme_toggle_is_saved() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("config.json"));
        let mut observer = persist_changes(store.clone(), Config::default());
        observer(
            &ChromeEvent::ThemeChanged(Theme::Light),
            &Preferences {
                theme: Theme::Light,
                shake_mode: false,
            },
        );
        assert_eq!(store.load().theme, Theme::Light);
    }
}
