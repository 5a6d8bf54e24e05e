//! `contrail ls` — List containers seeded into the metadata cache.

use clap::Args;
use contrail_common::config::ContrailConfig;
use contrail_events::cache::MetadataCache;
use contrail_runtime::introspect;

use crate::output;

/// Arguments for the `ls` command.
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Show full container IDs.
    #[arg(long)]
    pub no_trunc: bool,
}

/// Executes the `ls` command.
///
/// Bootstraps the metadata cache from the runtime state directory and
/// prints its entries in a tabular format.
///
/// # Errors
///
/// Returns an error if the runtime state directory cannot be enumerated.
pub fn execute(args: &LsArgs, config: &ContrailConfig) -> anyhow::Result<()> {
    let cache = MetadataCache::bootstrap(introspect::from_config(config))?;
    let entries = cache.snapshot();

    if entries.is_empty() {
        println!("No containers found.");
        return Ok(());
    }

    println!("{:<14} {:<20} {:<10} {:<30}", "CONTAINER ID", "NAME", "PHASE", "IMAGE");
    for (id, event) in &entries {
        let shown = if args.no_trunc { id.as_str() } else { id.short() };
        println!(
            "{:<14} {:<20} {:<10} {:<30}",
            shown,
            output::truncate(&event.name, 20),
            event.phase,
            output::truncate(output::or_dash(&event.image_name), 30)
        );
    }
    Ok(())
}
