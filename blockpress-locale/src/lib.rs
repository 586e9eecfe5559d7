//! Locale resolution for blockpress content.
//!
//! Localized fields are stored as per-locale wrappers (see
//! [`blockpress_model::LOCALIZED_KEY`]). Resolving a wrapper for a requested
//! locale tries, in order:
//!
//! 1. the requested locale
//! 2. its fallback chain (declared regional fallbacks, then the base language)
//! 3. the content's default locale
//!
//! and yields `null` when none of them has an entry. Resolution never fails.
//!
//! [`resolve_fields`] applies this through a node's values, descending only
//! into the paths the block's [`FieldSchema`](blockpress_model::FieldSchema)
//! declares. Structure the schema does not mark as localized is returned
//! untouched, even when it happens to look like a wrapper.

mod resolver;
mod settings;

pub use resolver::{LocaleRequest, pick_locale, resolve, resolve_fields, resolve_request};
pub use settings::{LocaleSettings, base_language};
