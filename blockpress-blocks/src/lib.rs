//! Standard block library for blockpress sites.
//!
//! | Type | Children | Enriches from |
//! |------|----------|---------------|
//! | `section` | any | |
//! | `columns` | up to 4 | |
//! | `heading` | none | |
//! | `rich-text` | none | |
//! | `image` | none | `media` collection |
//! | `post-list` | none | `posts` collection |
//!
//! Blocks that need stored records read them through a [`CollectionSource`]
//! supplied at registration.

mod error;
mod layout;
mod listing;
mod media;
mod source;
mod text;

pub use error::{SourceError, SourceResult};
pub use layout::{COLUMNS, MAX_COLUMNS, SECTION, columns, section};
pub use listing::{POST_LIST, POSTS_COLLECTION, PostQuery, post_list};
pub use media::{IMAGE, MEDIA_COLLECTION, UploadEnricher, image};
pub use source::{CollectionSource, InMemoryCollections, Query, Record, Sort};
pub use text::{HEADING, RICH_TEXT, heading, rich_text};

use blockpress_registry::{BlockRegistry, RegistryBuilder, RegistryResult};
use std::sync::Arc;

/// Registers every standard block on `builder`.
pub fn register_standard(builder: &mut RegistryBuilder, source: Arc<dyn CollectionSource>) -> RegistryResult<()> {
    builder
        .register(section())?
        .register(columns())?
        .register(heading())?
        .register(rich_text())?
        .register(image(Arc::clone(&source)))?
        .register(post_list(source))?;
    Ok(())
}

/// A registry holding only the standard blocks.
pub fn standard_registry(source: Arc<dyn CollectionSource>) -> RegistryResult<BlockRegistry> {
    let mut builder = BlockRegistry::builder();
    register_standard(&mut builder, source)?;
    Ok(builder.build())
}
