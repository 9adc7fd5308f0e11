//! # Session
//!
//! Connection settings shared by every subcommand, and the step that turns
//! them into a loaded `PackAccess`.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use folio_access::{LoadOutcome, Notifier, PackAccess, TracingNotifier};
use folio_client::{ClientConfig, FolioClient};
use folio_core::{AuthContext, PackSlug};

use crate::console::ConsoleNotifier;

/// Exit code when the pack does not exist.
pub const EXIT_NOT_FOUND: u8 = 3;

/// Global connection flags.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// API root. Overrides `FOLIO_API_URL`.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Bearer token of the signed-in user.
    #[arg(long, env = "FOLIO_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Request timeout in seconds. Overrides `FOLIO_TIMEOUT_SECS`.
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Emit logs and notices as JSON events on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,
}

/// Where user notices go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSink {
    /// Plain `LEVEL: message` lines.
    Console,
    /// Structured events through the installed subscriber.
    Tracing,
}

impl NoticeSink {
    pub fn notifier(self) -> Arc<dyn Notifier> {
        match self {
            Self::Console => Arc::new(ConsoleNotifier),
            Self::Tracing => Arc::new(TracingNotifier),
        }
    }
}

impl ConnectionArgs {
    /// Client configuration: environment first, then flags.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.api_url {
            Some(url) => ClientConfig::new(url).context("invalid --api-url")?,
            None => ClientConfig::from_env().context("invalid FOLIO_API_URL")?,
        };
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout_secs(secs);
        }
        Ok(config)
    }

    pub fn auth(&self) -> AuthContext {
        AuthContext::from_optional(self.token.clone())
    }

    pub fn notice_sink(&self) -> NoticeSink {
        if self.log_json {
            NoticeSink::Tracing
        } else {
            NoticeSink::Console
        }
    }
}

/// A `PackAccess` bound to the HTTP backend, plus the caller's credential.
pub struct Session {
    pub access: PackAccess,
    pub auth: AuthContext,
}

impl Session {
    pub fn connect(args: &ConnectionArgs) -> Result<Self> {
        let config = args.client_config()?;
        tracing::debug!(
            base_url = %config.base_url,
            timeout_secs = config.timeout_secs,
            "connecting"
        );
        let client = Arc::new(FolioClient::new(config).context("building HTTP client")?);
        Ok(Self {
            access: PackAccess::new(client.clone(), client, args.notice_sink().notifier()),
            auth: args.auth(),
        })
    }

    /// Load `slug`. `Some(code)` means stop with that exit code.
    pub async fn load(&self, slug: &str) -> Result<Option<u8>> {
        let slug = PackSlug::new(slug).context("invalid pack slug")?;
        match self.access.load(&slug, &self.auth).await {
            LoadOutcome::Loaded { .. } => Ok(None),
            LoadOutcome::BackToCatalog => Ok(Some(EXIT_NOT_FOUND)),
            LoadOutcome::Failed(_) | LoadOutcome::Unmounted => Ok(Some(1)),
        }
    }
}
