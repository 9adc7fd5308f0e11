//! # Read Subcommand
//!
//! Opens the reader on a pack and applies a sequence of moves, printing
//! what is on screen after each one. Locked documents never appear: the
//! reader only addresses the unlocked prefix.

use anyhow::Result;
use clap::{Args, ValueEnum};

use folio_access::PackAccess;
use folio_state::{ReaderMode, ReaderState};

use crate::session::{ConnectionArgs, Session};

/// Reader mode on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Continuous with a grant, single otherwise.
    Auto,
    Single,
    Continuous,
}

/// Arguments for `folio read`.
#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Pack slug.
    pub slug: String,

    #[arg(long, value_enum, default_value_t = ModeArg::Auto)]
    pub mode: ModeArg,

    /// Position to open at (1-based, like the document list). Implies single mode.
    #[arg(long)]
    pub position: Option<usize>,

    /// Relative moves to apply in order, e.g. `--step 1 --step -1`.
    #[arg(long = "step", allow_hyphen_values = true)]
    pub steps: Vec<isize>,

    /// Switch to this mode after the moves.
    #[arg(long, value_enum)]
    pub switch_to: Option<ModeArg>,

    /// Print the document list before reading.
    #[arg(long)]
    pub list: bool,
}

/// Execute the read subcommand.
pub async fn run_read(args: &ReadArgs, connection: &ConnectionArgs) -> Result<u8> {
    let session = Session::connect(connection)?;
    if let Some(code) = session.load(&args.slug).await? {
        return Ok(code);
    }
    let access = &session.access;

    if args.list {
        for option in access.index_options() {
            println!("  {:>2}. {}", option.position + 1, option.label);
        }
    }

    let opened = match (args.position, args.mode) {
        (Some(position), _) => access.open_from_card(position.saturating_sub(1)),
        (None, ModeArg::Auto) => access.open_reader_default(),
        (None, ModeArg::Single) => access.open_reader(ReaderMode::Single, 0),
        (None, ModeArg::Continuous) => access.open_reader(ReaderMode::Continuous, 0),
    };
    if opened.is_err() {
        return Ok(1);
    }
    print_screen(access);

    for &delta in &args.steps {
        if access.navigate(delta).is_err() {
            return Ok(1);
        }
        print_screen(access);
    }

    if let Some(target) = args.switch_to {
        let mode = match target {
            ModeArg::Auto | ModeArg::Single => ReaderMode::Single,
            ModeArg::Continuous => ReaderMode::Continuous,
        };
        if access.switch_mode(mode).is_err() {
            return Ok(1);
        }
        print_screen(access);
    }

    access.close_reader();
    Ok(0)
}

fn print_screen(access: &PackAccess) {
    let ReaderState::Open { mode, index } = access.reader_state() else {
        return;
    };
    let total = access.unlocked_count();
    match mode {
        ReaderMode::Single => println!("[single {}/{}]", index + 1, total),
        ReaderMode::Continuous => println!("[continuous, {total} documents]"),
    }
    for (position, asset) in access.visible_assets() {
        println!(
            "  {:>2}. {}  {}",
            position + 1,
            asset.display_label(position),
            asset.location().unwrap_or("(no file)")
        );
    }
    if mode == ReaderMode::Single {
        let prev = if access.has_previous() { "← prev" } else { "" };
        let next = if access.has_next() { "next →" } else { "" };
        if !prev.is_empty() || !next.is_empty() {
            println!("  {prev:<8}{next}");
        }
    }
}
