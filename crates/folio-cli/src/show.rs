//! # Show Subcommand
//!
//! Prints a pack: title, price, description, request banner and one line
//! per document with its lock state.

use anyhow::Result;
use clap::Args;

use folio_access::PackAccess;

use crate::session::{ConnectionArgs, Session};

/// Arguments for `folio show`.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Pack slug.
    pub slug: String,
}

/// Execute the show subcommand.
pub async fn run_show(args: &ShowArgs, connection: &ConnectionArgs) -> Result<u8> {
    let session = Session::connect(connection)?;
    if let Some(code) = session.load(&args.slug).await? {
        return Ok(code);
    }
    print_pack(&session.access);
    Ok(0)
}

fn print_pack(access: &PackAccess) {
    let Some(pack) = access.pack() else {
        return;
    };
    println!("{}", pack.title);
    println!("  Price: {}", pack.price_label());
    println!("  Status: {}", pack.status);
    for block in pack.description_blocks() {
        println!();
        println!("  {block}");
    }

    if let Some(notice) = access.status_notice() {
        println!();
        println!("  [{}] {}", notice.headline, notice.detail);
    }

    println!();
    println!(
        "Documents ({} of {} unlocked):",
        access.unlocked_count(),
        pack.total_assets()
    );
    for slot in access.slots() {
        let marker = if slot.unlocked { " " } else { "🔒" };
        match &slot.location {
            Some(location) => {
                println!("  {marker} {:>2}. {}  {location}", slot.position + 1, slot.label)
            }
            None => println!("  {marker} {:>2}. {}", slot.position + 1, slot.label),
        }
    }
}
