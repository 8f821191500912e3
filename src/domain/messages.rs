//! Concrete request and response schemas of the tournament protocol.

use super::envelope::{Message, MessageCatalog};
use super::tournament::{TournamentRecord, TournamentSummary};
use serde::{Deserialize, Serialize};

/// Player asks for the live tournaments of one game type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListRequest {
    pub game_type: String,
}

impl Message for ListRequest {
    const TYPE_ID: &'static str = "tourney.player.ListRequest";
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListResponse {
    pub tournaments: Vec<TournamentSummary>,
}

impl Message for ListResponse {
    const TYPE_ID: &'static str = "tourney.player.ListResponse";
}

/// Batched state push from a game-logic server.
///
/// A `null` entry is kept as `None` so the handler can reject it explicitly.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateRequest {
    pub infos: Vec<Option<TournamentRecord>>,
}

impl Message for UpdateRequest {
    const TYPE_ID: &'static str = "tourney.admin.UpdateRequest";
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateResponse {
    pub updated: u32,
}

impl Message for UpdateResponse {
    const TYPE_ID: &'static str = "tourney.admin.UpdateResponse";
}

/// Releases a tournament's lease before it expires.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CloseRequest {
    pub game_type: String,
    pub id: i32,
}

impl Message for CloseRequest {
    const TYPE_ID: &'static str = "tourney.admin.CloseRequest";
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CloseResponse {
    pub removed: bool,
}

impl Message for CloseResponse {
    const TYPE_ID: &'static str = "tourney.admin.CloseResponse";
}

/// Catalog of every message above.
pub fn protocol_catalog() -> MessageCatalog {
    MessageCatalog::new()
        .with::<ListRequest>()
        .with::<ListResponse>()
        .with::<UpdateRequest>()
        .with::<UpdateResponse>()
        .with::<CloseRequest>()
        .with::<CloseResponse>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::envelope::Envelope;

    #[test]
    fn test_update_request_keeps_null_entries() {
        let payload = br#"{"infos":[{"id":1,"game_type":"poker"},null]}"#;
        let envelope = Envelope {
            type_id: UpdateRequest::TYPE_ID.to_string(),
            payload: payload.to_vec(),
        };
        let request: UpdateRequest = envelope.unwrap_as().unwrap();
        assert_eq!(request.infos.len(), 2);
        assert_eq!(request.infos[0].as_ref().unwrap().game_type, "poker");
        assert!(request.infos[1].is_none());
    }

    #[test]
    fn test_protocol_catalog_knows_every_message() {
        let catalog = protocol_catalog();
        for type_id in [
            ListRequest::TYPE_ID,
            ListResponse::TYPE_ID,
            UpdateRequest::TYPE_ID,
            UpdateResponse::TYPE_ID,
            CloseRequest::TYPE_ID,
            CloseResponse::TYPE_ID,
        ] {
            let envelope = Envelope {
                type_id: type_id.to_string(),
                payload: b"{}".to_vec(),
            };
            let decoded = catalog.decode(&envelope).unwrap();
            assert_eq!(decoded.type_id_str(), type_id);
        }
    }
}
