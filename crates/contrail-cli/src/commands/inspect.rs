//! `contrail inspect` — Show cached metadata for a container.

use clap::Args;
use contrail_common::config::ContrailConfig;
use contrail_common::types::ContainerId;
use contrail_events::cache::MetadataCache;
use contrail_runtime::introspect;

use crate::output;

/// Arguments for the `inspect` command.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Container ID.
    pub id: String,

    /// Print the entry as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Executes the `inspect` command.
///
/// Looks the container up in the metadata cache, resolving it from the
/// runtime state directory if the bootstrap did not include it.
///
/// # Errors
///
/// Returns an error if the container cannot be resolved.
pub fn execute(args: &InspectArgs, config: &ContrailConfig) -> anyhow::Result<()> {
    let cache = MetadataCache::from_config(config, introspect::from_config(config))?;
    let id = ContainerId::new(args.id.as_str());
    let event = cache.get(&id)?;
    if cache.is_degraded() {
        tracing::warn!(id = %id, "container enumeration failed, showing a direct lookup");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&event)?);
        return Ok(());
    }

    println!("{:<12} {id}", "ID:");
    println!("{:<12} {}", "NAME:", output::or_dash(&event.name));
    println!("{:<12} {}", "PHASE:", event.phase);
    println!("{:<12} {}", "IMAGE:", output::or_dash(&event.image_name));
    println!("{:<12} {}", "IMAGE ID:", output::or_dash(&event.image_id));
    println!("{:<12} {}", "PID:", output::format_pid(event.host_pid));
    Ok(())
}
