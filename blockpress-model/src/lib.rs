//! Content tree model for blockpress.
//!
//! A page is stored as two independent halves:
//! - [`ContentTree`]: the ordered tree of typed block [`Node`]s (id, type, children)
//! - [`ValueStore`]: node id → field values, decoupled from tree shape
//!
//! Moving or re-parenting a node only touches the tree; its stored values stay
//! keyed by id. A node with no entry in the store has empty values.
//!
//! This crate also defines the pieces of a block's contract that the rest of
//! the engine (and external collaborators such as the admin form generator)
//! read without needing the render/enrich functions:
//! - [`FieldSchema`]: the fields a block type stores, which of them are localized
//! - [`ChildPolicy`]: whether a block may nest children, and how many
//! - [`BlockCatalog`]: lookup of those two by block type, used by [`validate`]
//!
//! Structural checks run eagerly at save time ([`ensure_page_valid`]) and
//! lazily at render time ([`validate`], whose violations callers log and skip).

mod error;
mod localized;
mod page;
mod policy;
mod schema;
mod traverse;
mod tree;
mod validate;
mod values;

pub use error::{
    ChildConstraintViolation, FieldProblem, FieldViolation, ModelError, ModelResult,
    StructuralError,
};
pub use localized::{LOCALIZED_KEY, as_localized, is_localized, localized};
pub use page::PageContent;
pub use policy::{BlockCatalog, ChildPolicy};
pub use schema::{FieldDef, FieldKind, FieldSchema};
pub use traverse::{Traverse, Visit, traverse};
pub use tree::{ContentTree, Node};
pub use validate::{Violation, ensure_page_valid, ensure_valid, validate};
pub use values::ValueStore;
