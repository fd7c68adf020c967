//! Command tree and shared output helpers.

pub(crate) mod cached;
pub(crate) mod fetch;

use clap::{Parser, Subcommand};

use ymobile_usage::{UsageError, UsageRecord};

/// Check Y!mobile data usage from the terminal.
#[derive(Debug, Parser)]
#[command(name = "ymusage", version, about)]
pub(crate) struct Cli {
    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Fetch usage, serving the cached record when it is under 15 minutes old.
    ///
    /// Credentials come from YMUSAGE_ID / YMUSAGE_PASSWORD or ~/.ymusage/config.json;
    /// the password is prompted for when missing and stdin is a terminal.
    Fetch {
        /// Ignore the cache and log in again.
        #[arg(short, long)]
        refresh: bool,
        /// Print the record as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show the cached record without contacting the portal.
    Cached {
        /// Print the cache entry as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Exit status: 2 for rejected credentials, 1 for everything else.
pub(crate) fn exit_code_for(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<UsageError>() {
        Some(e) if e.is_credential_error() => 2,
        _ => 1,
    }
}

/// Human-readable multi-line summary of a record.
pub(crate) fn format_record(record: &UsageRecord) -> String {
    let mut out = format!(
        "Remaining: {:.2} GB of {:.2} GB ({:.1}% used)\n",
        record.remaining_gb, record.total_gb, record.percentage_used
    );
    out.push_str(&format!("  Carried over:   {:>7.2} GB\n", record.carried_over_gb));
    out.push_str(&format!("  Base allowance: {:>7.2} GB\n", record.base_allowance_gb));
    out.push_str(&format!("  Paid add-on:    {:>7.2} GB\n", record.paid_addon_gb));
    out.push_str(&format!("  Used:           {:>7.2} GB\n", record.used_gb));
    if record.is_over_allowance() {
        out.push_str("  Allowance exceeded\n");
    }
    out.push_str(&format!("Updated: {}", record.last_updated_label));
    out
}
