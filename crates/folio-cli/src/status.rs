//! # Status Subcommand
//!
//! Refreshes and prints the user's access state on a pack.

use anyhow::Result;
use clap::Args;

use crate::session::{ConnectionArgs, Session};

/// Arguments for `folio status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Pack slug.
    pub slug: String,
}

/// Execute the status subcommand.
///
/// Loading already fetches the status once; no second call is made.
pub async fn run_status(args: &StatusArgs, connection: &ConnectionArgs) -> Result<u8> {
    let session = Session::connect(connection)?;
    if let Some(code) = session.load(&args.slug).await? {
        return Ok(code);
    }

    let snapshot = session.access.snapshot();
    println!("Access: {}", if snapshot.grant { "granted" } else { "preview only" });
    match &snapshot.request {
        Some(request) => {
            println!("  Request: {} ({})", request.id, request.status);
            println!("  Created: {}", request.created_at);
            if let Some(approved_at) = &request.approved_at {
                println!("  Approved: {approved_at}");
            }
        }
        None => println!("  Request: none"),
    }
    if let Some(notice) = session.access.status_notice() {
        println!("  {}: {}", notice.headline, notice.detail);
    }
    if !session.auth.is_authenticated() {
        println!("  (not signed in: pass --token or set FOLIO_TOKEN)");
    }
    Ok(0)
}
