//! fieldshare-reconcile: merging provider observations into canonical items
//!
//! One reconciliation function serves every provider; providers differ only
//! in their adapter, which maps a raw payload onto an [`Observation`].
//! The merge itself is pure and idempotent: re-running an import after a
//! partial failure is always safe.

pub mod adapters;
pub mod caption;
pub mod observation;
pub mod partial;
pub mod reconcile;
pub mod retry;
pub mod slug;

pub use adapters::{AdapterError, DropboxAdapter, FlickrAdapter, InaturalistAdapter, ProviderAdapter};
pub use caption::parse_item_description;
pub use observation::Observation;
pub use partial::PartialItem;
pub use reconcile::{reconcile, ReconcileError};
pub use retry::{QuotaBudget, RetryPolicy};
pub use slug::slugify;
