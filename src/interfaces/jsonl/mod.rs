//! Line-delimited JSON driver for the two services.
//!
//! Each input line is one request addressed to a service; each request yields
//! exactly one output line. The driver stands in for the RPC transport when
//! the binary is run locally.

pub mod request_reader;
pub mod response_writer;

use crate::application::admin::AdminService;
use crate::application::player::PlayerService;
use crate::domain::envelope::{Envelope, Response};
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Player,
    Admin,
}

/// One request line. `payload` is the message body as plain JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestLine {
    pub service: ServiceKind,
    pub type_id: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl RequestLine {
    pub fn to_envelope(&self) -> Result<Envelope> {
        Ok(Envelope {
            type_id: self.type_id.clone(),
            payload: serde_json::to_vec(&self.payload)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AckLine {
    pub type_id: String,
    pub payload: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseLine {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ack: Option<AckLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResponseLine {
    fn from_response(response: Response) -> Result<Self> {
        let ack = match response.ack {
            Some(envelope) => Some(AckLine {
                payload: serde_json::from_slice(&envelope.payload)?,
                type_id: envelope.type_id,
            }),
            None => None,
        };
        Ok(Self {
            ok: true,
            ack,
            error: None,
        })
    }

    fn failure(error: impl ToString) -> Self {
        Self {
            ok: false,
            ack: None,
            error: Some(error.to_string()),
        }
    }
}

/// Routes request lines to the player or admin service.
#[derive(Clone)]
pub struct Router {
    player: PlayerService,
    admin: AdminService,
}

impl Router {
    pub fn new(player: PlayerService, admin: AdminService) -> Self {
        Self { player, admin }
    }

    /// Handles one request; failures become an `ok: false` line.
    pub async fn route(&self, line: &RequestLine) -> ResponseLine {
        let outcome = match line.to_envelope() {
            Ok(envelope) => match line.service {
                ServiceKind::Player => self.player.handle(&envelope).await,
                ServiceKind::Admin => self.admin.handle(&envelope).await,
            },
            Err(e) => Err(e),
        };

        match outcome.and_then(ResponseLine::from_response) {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(service = ?line.service, type_id = %line.type_id, "Request failed: {}", e);
                ResponseLine::failure(e)
            }
        }
    }
}
