use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// Presentation state the typing engine never reads.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Preferences {
    pub theme: Theme,
    /// Emphasise the word under the cursor.
    pub shake_mode: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromeEvent {
    ThemeChanged(Theme),
    ShakeModeChanged(bool),
}

type Observer = Box<dyn FnMut(&ChromeEvent, &Preferences)>;

/// Owns the preferences and tells registered observers about every change.
pub struct Chrome {
    prefs: Preferences,
    observers: Vec<Observer>,
}

impl Chrome {
    pub fn new(prefs: Preferences) -> Self {
        Self {
            prefs,
            observers: Vec::new(),
        }
    }

    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&ChromeEvent, &Preferences) + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    pub fn preferences(&self) -> Preferences {
        self.prefs
    }

    pub fn toggle_theme(&mut self) {
        self.prefs.theme = self.prefs.theme.toggled();
        self.notify(ChromeEvent::ThemeChanged(self.prefs.theme));
    }

    pub fn toggle_shake_mode(&mut self) {
        self.prefs.shake_mode = !self.prefs.shake_mode;
        self.notify(ChromeEvent::ShakeModeChanged(self.prefs.shake_mode));
    }

    fn notify(&mut self, event: ChromeEvent) {
        let prefs = self.prefs;
        for observer in self.observers.iter_mut() {
            observer(&event, &prefs);
        }
    }
}

impl std::fmt::Debug for Chrome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chrome")
            .field("prefs", &self.prefs)
            .field("observers", &self.observers.len())
            .finish()
    }
}
