//! Section catalog model.
//!
//! Types here mirror the section files under `public/data/`. Records are only
//! constructed through validation; `CatalogRepository` holds the sections of a
//! loaded catalog and answers cross-section lookups.

pub mod identity;
pub mod model;
pub mod repository;
pub mod status;

pub use identity::{CategoryCode, SectionKind};
pub use model::{
    CategoryDictionary, CategoryMeta, Flag, Record, SearchIndex, Section, SectionFields,
};
pub use repository::{CatalogRepository, DuplicateName, name_key};
pub use status::Status;
