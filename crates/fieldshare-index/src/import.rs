//! The import driver.
//!
//! Feeds already-fetched provider payloads through an adapter and the
//! reconciler into the canonical store. Every per-payload failure is
//! logged and skipped; re-running an import after a partial failure is
//! safe because reconciliation is idempotent.

use serde_json::Value;
use tracing::{debug, info, warn};

use fieldshare_domain::Item;
use fieldshare_reconcile::{reconcile, ProviderAdapter, QuotaBudget};

use crate::error::IndexError;
use crate::paths::item_file;
use crate::records::{load_item, save_item};
use crate::store::ContentStore;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportOutcome {
    pub imported: usize,
    pub skipped: usize,
}

/// Import a batch of payloads for one user. With `force` false, payloads
/// no newer than the stored item's `updated_at` are skipped unread. The
/// quota budget bounds how many payloads one run may process; the rest are
/// picked up by the next idempotent re-run.
pub fn import_observations(
    store: &dyn ContentStore,
    user: &str,
    adapter: &dyn ProviderAdapter,
    payloads: &[Value],
    force: bool,
    quota: &mut QuotaBudget,
) -> Result<ImportOutcome, IndexError> {
    let mut outcome = ImportOutcome::default();

    for payload in payloads {
        if !quota.take(1) {
            info!(user, provider = adapter.source_tag(), "quota exhausted");
            break;
        }
        let observation = match adapter.observation(payload) {
            Ok(observation) => observation,
            Err(e) => {
                warn!(user, provider = adapter.source_tag(), error = %e, "skipping payload");
                outcome.skipped += 1;
                continue;
            }
        };

        let year = observation
            .year()
            .map(|y| y.to_string())
            .unwrap_or_else(|| "undated".to_string());
        let path = item_file(user, adapter.source_tag(), &year, &observation.slug);

        let existing = match load_item(store, &path) {
            Ok(Some(item)) => item,
            Ok(None) => Item::default(),
            Err(e) if e.is_per_record() => {
                warn!(%path, error = %e, "skipping unreadable existing item");
                outcome.skipped += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        let fresh = match (existing.updated_at, observation.updated_at) {
            (Some(stored), Some(incoming)) => incoming > stored,
            _ => true,
        };
        if !force && !fresh {
            debug!(%path, "up to date");
            outcome.skipped += 1;
            continue;
        }

        match reconcile(&existing, &observation) {
            Ok(item) => {
                save_item(store, &path, &item)?;
                outcome.imported += 1;
            }
            Err(e) => {
                warn!(%path, error = %e, "discarding invalid reconciliation");
                outcome.skipped += 1;
            }
        }
    }

    info!(
        user,
        provider = adapter.source_tag(),
        imported = outcome.imported,
        skipped = outcome.skipped,
        "import finished"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemStore;
    use fieldshare_reconcile::InaturalistAdapter;

    fn payload(updated_at: &str) -> Value {
        serde_json::json!({
            "id": 101,
            "time_observed_at": "2020-03-01T06:30:00+11:00",
            "identifications": [
                { "taxon": { "name": "Litoria ewingii" }, "user": { "login": "frogfan" } }
            ],
            "photos": [],
            "created_at": "2020-03-01T07:00:00+11:00",
            "updated_at": updated_at
        })
    }

    #[test]
    fn imports_and_persists() {
        let store = MemStore::new();
        let outcome = import_observations(
            &store,
            "alice",
            &InaturalistAdapter,
            &[payload("2020-03-02T07:00:00+11:00")],
            false,
            &mut QuotaBudget::unlimited(),
        )
        .unwrap();
        assert_eq!(outcome.imported, 1);

        let item = load_item(&store, "alice/items/inaturalist/2020/101.yaml")
            .unwrap()
            .expect("item written");
        assert_eq!(item.identifications[0].name, "Litoria ewingii");
        assert!(item.tags.contains(&"inaturalist".to_string()));
    }

    #[test]
    fn stale_payloads_are_skipped_unless_forced() {
        let store = MemStore::new();
        let newer = payload("2020-03-02T07:00:00+11:00");
        let older = payload("2020-03-01T07:30:00+11:00");

        import_observations(
            &store,
            "alice",
            &InaturalistAdapter,
            &[newer],
            false,
            &mut QuotaBudget::unlimited(),
        )
        .unwrap();
        let outcome = import_observations(
            &store,
            "alice",
            &InaturalistAdapter,
            &[older.clone()],
            false,
            &mut QuotaBudget::unlimited(),
        )
        .unwrap();
        assert_eq!(outcome.imported, 0);
        assert_eq!(outcome.skipped, 1);

        // Forced re-import runs the reconciliation; updated_at still never
        // regresses.
        let outcome = import_observations(
            &store,
            "alice",
            &InaturalistAdapter,
            &[older],
            true,
            &mut QuotaBudget::unlimited(),
        )
        .unwrap();
        assert_eq!(outcome.imported, 1);
        let item = load_item(&store, "alice/items/inaturalist/2020/101.yaml")
            .unwrap()
            .unwrap();
        assert_eq!(
            item.updated_at.unwrap().to_rfc3339(),
            "2020-03-02T07:00:00+11:00"
        );
    }

    #[test]
    fn unusable_payloads_are_counted_as_skipped() {
        let store = MemStore::new();
        let mut bad = payload("2020-03-02T07:00:00+11:00");
        bad["ofvs"] = serde_json::json!([{ "name": "Fieldshare URL" }]);
        let outcome = import_observations(
            &store,
            "alice",
            &InaturalistAdapter,
            &[bad],
            false,
            &mut QuotaBudget::unlimited(),
        )
        .unwrap();
        assert_eq!(outcome.imported, 0);
        assert_eq!(outcome.skipped, 1);
    }

    #[test]
    fn quota_bounds_the_batch() {
        let store = MemStore::new();
        let batch = vec![
            payload("2020-03-02T07:00:00+11:00"),
            payload("2020-03-03T07:00:00+11:00"),
        ];
        let mut quota = QuotaBudget::limited(1);
        let outcome =
            import_observations(&store, "alice", &InaturalistAdapter, &batch, true, &mut quota)
                .unwrap();
        assert_eq!(outcome.imported, 1);
        assert!(quota.is_exhausted());
    }
}
