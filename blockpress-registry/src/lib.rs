//! Block registry for blockpress.
//!
//! A [`BlockDefinition`] bundles everything the engine knows about one block
//! type:
//! - its [`FieldSchema`](blockpress_model::FieldSchema) (also consumed by the admin form generator)
//! - its [`ChildPolicy`](blockpress_model::ChildPolicy)
//! - an optional [`Enricher`] that fetches display data before render
//! - a [`BlockRenderer`] producing a [`RenderNode`]
//!
//! Definitions are registered once at boot through [`RegistryBuilder`]; the
//! resulting [`BlockRegistry`] is immutable and shared behind an `Arc` by every
//! render. Looking up a type that is not registered returns the unknown-block
//! sentinel, which fetches nothing and renders only its children.

mod context;
mod definition;
mod error;
mod output;
mod registry;

pub use context::RenderContext;
pub use definition::{BlockDefinition, BlockRenderer, Enricher, RenderInput, UNKNOWN_BLOCK_TYPE};
pub use error::{EnrichError, RegistryError, RegistryResult, RenderError};
pub use output::RenderNode;
pub use registry::{BlockRegistry, BlockSchema, RegistryBuilder};
