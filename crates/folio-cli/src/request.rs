//! # Request Subcommand
//!
//! Submits an access request for the signed-in user.

use anyhow::Result;
use clap::Args;

use folio_access::EnrollOutcome;

use crate::session::{ConnectionArgs, Session};

/// Exit code when the user must sign in first.
pub const EXIT_SIGN_IN: u8 = 2;

/// Arguments for `folio request`.
#[derive(Args, Debug)]
pub struct RequestArgs {
    /// Pack slug.
    pub slug: String,

    /// Contact handle (WhatsApp number) for the administrator.
    #[arg(long)]
    pub contact: Option<String>,
}

/// Execute the request subcommand.
pub async fn run_request(args: &RequestArgs, connection: &ConnectionArgs) -> Result<u8> {
    let session = Session::connect(connection)?;
    if let Some(code) = session.load(&args.slug).await? {
        return Ok(code);
    }

    let outcome = session
        .access
        .request_access(args.contact.as_deref(), &session.auth)
        .await;
    tracing::debug!(?outcome, "access request finished");

    Ok(match outcome {
        EnrollOutcome::Granted => 0,
        EnrollOutcome::Requested { request } => {
            if let Some(request) = request {
                println!("Request {} is {}.", request.id, request.status);
            }
            0
        }
        EnrollOutcome::SignInRequired => EXIT_SIGN_IN,
        EnrollOutcome::Refused { .. } | EnrollOutcome::Failed { .. } | EnrollOutcome::NoPack => 1,
    })
}
