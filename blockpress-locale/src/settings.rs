use crate::resolver::LocaleRequest;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Site-wide locale configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleSettings {
    pub default_locale: String,
    /// Declared fallbacks, e.g. `"de-AT" -> "de"`, `"sk" -> "cs"`.
    pub fallbacks: BTreeMap<String, String>,
    /// Fall back from a regional variant to its base language when no
    /// explicit fallback is declared (`"pt-BR"` → `"pt"`).
    pub implicit_base_fallback: bool,
    /// Locales the site publishes. Informational; resolution does not
    /// restrict requests to this list.
    pub available: Vec<String>,
}

impl Default for LocaleSettings {
    fn default() -> Self {
        Self {
            default_locale: "en".to_string(),
            fallbacks: BTreeMap::new(),
            implicit_base_fallback: true,
            available: vec!["en".to_string()],
        }
    }
}

impl LocaleSettings {
    pub fn new(default_locale: impl Into<String>) -> Self {
        let default_locale = default_locale.into();
        Self {
            available: vec![default_locale.clone()],
            default_locale,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_fallback(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.fallbacks.insert(from.into(), to.into());
        self
    }

    /// Ordered locales tried after `locale` and before the default.
    ///
    /// Declared fallbacks are followed transitively; a declared cycle stops at
    /// the first repeat. Neither `locale` itself nor the default locale appear
    /// in the result.
    pub fn fallback_chain(&self, locale: &str) -> Vec<String> {
        let mut chain = Vec::new();
        let mut seen = HashSet::from([locale.to_string(), self.default_locale.clone()]);
        let mut current = locale.to_string();
        loop {
            let next = self.fallbacks.get(&current).cloned().or_else(|| {
                if self.implicit_base_fallback {
                    base_language(&current).map(str::to_string)
                } else {
                    None
                }
            });
            let Some(next) = next else { break };
            if next == self.default_locale {
                break;
            }
            if !seen.insert(next.clone()) {
                break;
            }
            chain.push(next.clone());
            current = next;
        }
        chain
    }

    /// Builds the full resolution request for `locale`.
    pub fn request_for(&self, locale: &str) -> LocaleRequest {
        LocaleRequest::new(locale, self.fallback_chain(locale), &self.default_locale)
    }
}

/// `"de-AT"` → `"de"`, `"pt_BR"` → `"pt"`; `None` for a bare language.
pub fn base_language(locale: &str) -> Option<&str> {
    let (base, _) = locale.split_once(['-', '_'])?;
    (!base.is_empty()).then_some(base)
}
