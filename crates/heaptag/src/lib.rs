//! Tagged heap-object model: a frozen catalog of object kinds, an O(1)
//! category classifier, one-word object headers and a per-kind dispatch table
//! that is checked for completeness before it can be used.

pub mod classify;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod extension;
pub mod global;
pub mod hashing;
pub mod header;
pub mod kind;
pub mod model;
pub mod report;
pub mod scan;
pub mod standard;
pub mod tag_space;

pub use error::{ErrorClass, ErrorKind, ObjectModelError};
pub use kind::{Category, TagId};
pub use model::ObjectModel;
