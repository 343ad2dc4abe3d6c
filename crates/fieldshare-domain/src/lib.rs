//! Domain types for the fieldshare observation pipeline
//!
//! This crate provides the canonical domain models shared by the importers
//! and the index builders:
//! - Item: one observation record (identifications, media, location, tags)
//! - Media: a photo, video or audio attachment
//! - CollectionConfig: a named, filterable grouping of items
//! - Profile: user metadata consumed by the users index
//! - Facet tags: the `prefix~value` namespace used for filtering
//! - Validation: validity predicates applied before every persistence write

pub mod collection;
pub mod facet;
pub mod item;
pub mod location;
pub mod media;
pub mod profile;
pub mod validation;

pub use collection::*;
pub use facet::*;
pub use item::*;
pub use location::*;
pub use media::*;
pub use profile::*;
pub use validation::*;
