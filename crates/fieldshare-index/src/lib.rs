//! fieldshare-index: orchestration over the content store
//!
//! Walks user directories, loads canonical records, drives reconciliation
//! during imports and the feed aggregation during index builds, and writes
//! every derived artifact back through the store abstraction. Per-record
//! problems are logged and skipped; structural problems in generated
//! output abort the run.

pub mod collections_index;
pub mod config;
pub mod error;
pub mod fs_store;
pub mod import;
pub mod items_index;
pub mod paths;
pub mod records;
pub mod store;
pub mod users_index;

pub use collections_index::{build_all_collections, build_user_collections};
pub use config::SiteConfig;
pub use error::IndexError;
pub use fs_store::FsStore;
pub use import::{import_observations, ImportOutcome};
pub use items_index::build_user_items;
pub use store::{list_users, ContentStore, MemStore, StoreError};
pub use users_index::build_users_index;
