//! Property tests for fallback totality.

use blockpress_locale::{LocaleSettings, resolve_request};
use blockpress_model::localized;
use proptest::prelude::*;
use serde_json::Value;

fn locale_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["en", "de", "de-AT", "fr", "sk", "sk-SK", "pt-BR", "pt", "cs"])
        .prop_map(str::to_string)
}

fn variants_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec((locale_strategy(), "[a-z]{0,8}"), 0..6)
}

fn settings_strategy() -> impl Strategy<Value = LocaleSettings> {
    (
        locale_strategy(),
        prop::collection::btree_map(locale_strategy(), locale_strategy(), 0..5),
        any::<bool>(),
    )
        .prop_map(|(default_locale, fallbacks, implicit)| LocaleSettings {
            default_locale,
            fallbacks,
            implicit_base_fallback: implicit,
            available: Vec::new(),
        })
}

proptest! {
    #[test]
    fn resolution_always_terminates(
        settings in settings_strategy(),
        variants in variants_strategy(),
        requested in locale_strategy(),
    ) {
        let value = localized(variants.iter().map(|(l, v)| (l.clone(), Value::from(v.clone()))));
        let request = settings.request_for(&requested);
        prop_assert!(request.fallback_chain.len() < 10);
        let resolved = resolve_request(&value, &request);
        prop_assert!(resolved.is_null() || resolved.is_string());
    }

    #[test]
    fn null_only_when_every_candidate_is_missing(
        settings in settings_strategy(),
        variants in variants_strategy(),
        requested in locale_strategy(),
    ) {
        let value = localized(variants.iter().map(|(l, v)| (l.clone(), Value::from(v.clone()))));
        let request = settings.request_for(&requested);
        let any_hit = request
            .candidates()
            .any(|c| variants.iter().any(|(l, _)| l == c));
        prop_assert_eq!(resolve_request(&value, &request).is_null(), !any_hit);
    }

    #[test]
    fn requested_entry_always_wins(
        settings in settings_strategy(),
        variants in variants_strategy(),
        requested in locale_strategy(),
        text in "[a-z]{0,8}",
    ) {
        let mut entries: Vec<_> = variants
            .into_iter()
            .filter(|(l, _)| *l != requested)
            .map(|(l, v)| (l, Value::from(v)))
            .collect();
        entries.push((requested.clone(), Value::from(text.clone())));
        let request = settings.request_for(&requested);
        prop_assert_eq!(resolve_request(&localized(entries), &request), Value::from(text));
    }
}
