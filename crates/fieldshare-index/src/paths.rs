//! The persisted layout. These paths are a stable contract with the
//! content site and the sync plumbing.

use fieldshare_domain::collection_dir;

/// Global collections roll-up directory.
pub const GLOBAL_COLLECTIONS_DIR: &str = "_collections";

/// Users roll-up directory.
pub const USERS_INDEX_DIR: &str = "_users";

/// Canonical item file: `<user>/items/<provider>/<year>/<slug>.yaml`.
pub fn item_file(user: &str, provider: &str, year: &str, slug: &str) -> String {
    format!("{user}/items/{provider}/{year}/{slug}.yaml")
}

pub fn items_dir(user: &str) -> String {
    format!("{user}/items")
}

pub fn profile_file(user: &str) -> String {
    format!("{user}/profile.yaml")
}

/// Collection configs live beside the items: `<user>/collections/<name>.yaml`.
pub fn collection_config_dir(user: &str) -> String {
    format!("{user}/collections")
}

/// Generated per-user item feed directory.
pub fn user_items_index_dir(user: &str) -> String {
    format!("{user}/_index/items")
}

/// Generated per-user, per-collection member feed directory.
pub fn user_collection_index_dir(user: &str, name: &str) -> String {
    format!("{user}/_index/collections/{}", collection_dir(name))
}

/// Generated cross-member aggregate feed directory for a collection.
pub fn collection_aggregate_dir(user: &str, name: &str) -> String {
    format!("{user}/_index/collections/{}/aggregate", collection_dir(name))
}

/// Generated per-user collections roll-up directory.
pub fn user_collections_rollup_dir(user: &str) -> String {
    format!("{user}/_index/collections")
}

/// Generated global per-collection feed directory.
pub fn global_collection_dir(name: &str) -> String {
    format!("{GLOBAL_COLLECTIONS_DIR}/{name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout() {
        assert_eq!(
            item_file("alice", "flickr", "2020", "123"),
            "alice/items/flickr/2020/123.yaml"
        );
        assert_eq!(user_items_index_dir("alice"), "alice/_index/items");
        assert_eq!(
            user_collection_index_dir("alice", "Frog Ponds"),
            "alice/_index/collections/frog_ponds"
        );
        assert_eq!(
            collection_aggregate_dir("alice", "frog_ponds"),
            "alice/_index/collections/frog_ponds/aggregate"
        );
        assert_eq!(global_collection_dir("frogs"), "_collections/frogs");
    }
}
