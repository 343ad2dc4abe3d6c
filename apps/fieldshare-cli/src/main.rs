//! Fieldshare CLI
//!
//! Drives the import and index pipeline against a content store on disk.
//! Network fetching is external: `import` consumes a file of already
//! fetched provider payloads.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::error;
use url::Url;

use fieldshare_domain::{validate_item, MediaRequirement, ValidationSeverity};
use fieldshare_feeds::FeedConfig;
use fieldshare_index::{
    build_all_collections, build_user_collections, build_user_items, build_users_index,
    import_observations, list_users, ContentStore, FsStore, SiteConfig,
};
use fieldshare_reconcile::{
    DropboxAdapter, FlickrAdapter, InaturalistAdapter, ProviderAdapter, QuotaBudget,
};

#[derive(Parser)]
#[command(name = "fieldshare", version, about = "Observation importer and feed index builder")]
struct Cli {
    /// Root directory of the content store.
    #[arg(long, env = "CONTENT_FILE_PATH")]
    content_dir: PathBuf,

    #[arg(long, env = "APP_NAME", default_value = "Fieldshare")]
    app_name: String,

    /// Web app base URL.
    #[arg(long, env = "APP_HOST", default_value = "https://fieldshare.example.org/")]
    app_host: Url,

    /// Base URL the content store is served from.
    #[arg(
        long,
        env = "CONTENT_HOST",
        default_value = "https://files.fieldshare.example.org/"
    )]
    content_host: Url,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build item feeds for one user, or for every user.
    Items { user: Option<String> },
    /// Build collection aggregates for one user, or for every user.
    Collections { user: Option<String> },
    /// Build the users roll-up.
    Users,
    /// Build everything: items, collections, global roll-ups, users.
    All,
    /// Check every canonical record against the schema.
    Validate,
    /// Import fetched provider payloads for a user.
    Import {
        #[arg(long)]
        user: String,
        /// One of: dropbox, flickr, inaturalist.
        #[arg(long)]
        provider: String,
        /// JSON file holding an array of raw provider payloads.
        #[arg(long)]
        payload: PathBuf,
        /// Re-import payloads even when not newer than the stored item.
        #[arg(long)]
        force: bool,
        /// Stop after this many payloads; the rest wait for the next run.
        #[arg(long)]
        quota: Option<u64>,
    },
}

fn adapter_for(provider: &str) -> Result<Box<dyn ProviderAdapter>> {
    match provider {
        "dropbox" => Ok(Box::new(DropboxAdapter)),
        "flickr" => Ok(Box::new(FlickrAdapter)),
        "inaturalist" => Ok(Box::new(InaturalistAdapter)),
        _ => bail!("unknown provider: {provider}"),
    }
}

fn selected_users(store: &FsStore, user: Option<String>) -> Result<Vec<String>> {
    match user {
        Some(user) => Ok(vec![user]),
        None => Ok(list_users(store)?),
    }
}

fn validate_store(store: &FsStore) -> Result<()> {
    let mut failures = 0usize;

    for user in list_users(store)? {
        for path in store.list(&format!("{user}/items"))? {
            if !path.ends_with(".yaml") {
                continue;
            }
            match fieldshare_index::records::load_item(store, &path) {
                Ok(Some(item)) => {
                    let errors = validate_item(&item, MediaRequirement::Relaxed);
                    for e in errors
                        .iter()
                        .filter(|e| e.severity == ValidationSeverity::Error)
                    {
                        error!(%path, field = %e.field, message = %e.message, "invalid item");
                        failures += 1;
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    error!(%path, error = %e, "unreadable item");
                    failures += 1;
                }
            }
        }

        for path in store.list(&format!("{user}/collections"))? {
            if !path.ends_with(".yaml") {
                continue;
            }
            if let Err(e) = fieldshare_index::records::load_collection_config(store, &path) {
                error!(%path, error = %e, "unreadable collection config");
                failures += 1;
            }
        }

        let profile = format!("{user}/profile.yaml");
        if let Err(e) = fieldshare_index::records::load_profile(store, &profile) {
            error!(path = %profile, error = %e, "unreadable profile");
            failures += 1;
        }
    }

    if failures != 0 {
        bail!("{failures} invalid records");
    }
    println!("OK");
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = SiteConfig::new(
        cli.content_dir.clone(),
        FeedConfig::new(cli.app_name, cli.app_host, cli.content_host),
    );
    let store = FsStore::new(&cfg.content_dir);

    match cli.command {
        Command::Items { user } => {
            for user in selected_users(&store, user)? {
                build_user_items(&store, &cfg, &user)
                    .with_context(|| format!("building item feeds for {user}"))?;
            }
        }
        Command::Collections { user } => {
            for user in selected_users(&store, user)? {
                build_user_collections(&store, &cfg, &user)
                    .with_context(|| format!("building collections for {user}"))?;
            }
        }
        Command::Users => build_users_index(&store, &cfg)?,
        Command::All => {
            let users = list_users(&store)?;
            for user in &users {
                build_user_items(&store, &cfg, user)
                    .with_context(|| format!("building item feeds for {user}"))?;
            }
            for user in &users {
                build_user_collections(&store, &cfg, user)
                    .with_context(|| format!("building collections for {user}"))?;
            }
            build_all_collections(&store, &cfg)?;
            build_users_index(&store, &cfg)?;
        }
        Command::Validate => validate_store(&store)?,
        Command::Import {
            user,
            provider,
            payload,
            force,
            quota,
        } => {
            let adapter = adapter_for(&provider)?;
            let raw = std::fs::read_to_string(&payload)
                .with_context(|| format!("reading {}", payload.display()))?;
            let payloads: Vec<serde_json::Value> =
                serde_json::from_str(&raw).context("payload file must be a JSON array")?;
            let mut budget = quota.map_or_else(QuotaBudget::unlimited, QuotaBudget::limited);
            let outcome =
                import_observations(&store, &user, adapter.as_ref(), &payloads, force, &mut budget)?;
            println!("imported {}, skipped {}", outcome.imported, outcome.skipped);
        }
    }

    Ok(())
}
