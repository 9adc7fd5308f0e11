//! Typed client for the public pack catalog.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/books/{slug}` | Get a pack with its ordered files |

use serde::Deserialize;

use folio_core::{AuthContext, ContentPack, PackSlug};

use crate::error::ClientError;
use crate::transport::Transport;

/// The catalog answers either `{ "book": Pack }` or a bare pack.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PackEnvelope {
    Wrapped { book: ContentPack },
    Bare(ContentPack),
}

impl PackEnvelope {
    fn into_pack(self) -> ContentPack {
        match self {
            Self::Wrapped { book } => book,
            Self::Bare(pack) => pack,
        }
    }
}

/// Client for the catalog endpoints.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    transport: Transport,
}

impl CatalogClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Fetch a pack by slug.
    ///
    /// Calls `GET {base_url}/books/{slug}`. The catalog is public; the
    /// credential is forwarded when present.
    pub async fn get(
        &self,
        slug: &PackSlug,
        auth: &AuthContext,
    ) -> Result<ContentPack, ClientError> {
        let endpoint = format!("GET /books/{slug}");
        let url = self.transport.url(&["books", slug.as_str()])?;
        let request = self.transport.get(url, auth)?;
        let envelope: PackEnvelope = self.transport.send_json(request, &endpoint).await?;
        Ok(envelope.into_pack())
    }
}
