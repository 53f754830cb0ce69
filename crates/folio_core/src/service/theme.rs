//! Viewer theme preference.

use crate::report::{CoreEvent, Reporter};
use crate::store::{KeyValueStore, StoreResult, THEME_KEY};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemePreference {
    Light,
    Dark,
    /// Follow the platform color scheme.
    #[default]
    System,
}

impl ThemePreference {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }

    /// Reads the stored preference.
    ///
    /// Missing values yield the default. Unreadable or unknown values are
    /// reported and also yield the default.
    pub fn load(store: &dyn KeyValueStore, reporter: &dyn Reporter) -> Self {
        match store.get(THEME_KEY) {
            Ok(None) => Self::default(),
            Ok(Some(value)) => value.parse().unwrap_or_else(|_| {
                reporter.report(&CoreEvent::InvalidPreference {
                    key: THEME_KEY.to_string(),
                    value,
                });
                Self::default()
            }),
            Err(err) => {
                reporter.report(&CoreEvent::PersistenceFailed {
                    key: THEME_KEY.to_string(),
                    message: err.to_string(),
                });
                Self::default()
            }
        }
    }

    pub fn save(self, store: &dyn KeyValueStore) -> StoreResult<()> {
        store.set(THEME_KEY, self.as_str())
    }
}

impl Display for ThemePreference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" | "auto" => Ok(Self::System),
            other => Err(format!(
                "unsupported theme `{other}`; expected light|dark|system"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ThemePreference;
    use crate::report::MemoryReporter;
    use crate::store::{KeyValueStore, MemoryStore, THEME_KEY};

    #[test]
    fn parse_accepts_case_and_auto_alias() {
        assert_eq!(" DARK ".parse::<ThemePreference>(), Ok(ThemePreference::Dark));
        assert_eq!("auto".parse::<ThemePreference>(), Ok(ThemePreference::System));
        assert!("sepia".parse::<ThemePreference>().is_err());
    }

    #[test]
    fn unknown_stored_value_falls_back_and_is_reported() {
        let store = MemoryStore::new();
        let reporter = MemoryReporter::new();
        store.set(THEME_KEY, "sepia").unwrap();

        assert_eq!(
            ThemePreference::load(&store, &reporter),
            ThemePreference::System
        );
        assert_eq!(reporter.codes(), vec!["invalid_preference"]);

        ThemePreference::Light.save(&store).unwrap();
        assert_eq!(
            ThemePreference::load(&store, &reporter),
            ThemePreference::Light
        );
    }
}
