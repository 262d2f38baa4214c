//! Domain models for the Vision AI API.
//!
//! # Core Concepts
//!
//! ## Catalog
//!
//! - [`ObjectDefinition`]: A classifiable object type (e.g. `rain`, `water_level`)
//!   with its valid [`Label`] set.
//! - [`LabelOption`]: A label flattened out of the catalog and annotated with its
//!   owning object, ready to be offered to an annotator.
//!
//! ## Work Queue
//!
//! - [`Identification`]: A pending human classification task binding one image
//!   snapshot to one object type.
//! - [`Submission`]: The label a human chose for an identification.
//!
//! ## Admin Resources
//!
//! - [`Camera`] and [`Prompt`]: Listed by the admin console.
//! - [`Page`]: The pagination envelope every list endpoint returns.

mod auth;
mod camera;
mod identification;
mod object;
mod page;
mod prompt;

pub use auth::*;
pub use camera::*;
pub use identification::*;
pub use object::*;
pub use page::*;
pub use prompt::*;
