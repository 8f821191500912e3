use super::dispatcher::{DispatchMode, Dispatcher};
use super::store::TournamentStore;
use crate::domain::envelope::{Envelope, Response};
use crate::domain::messages::{
    CloseRequest, CloseResponse, UpdateRequest, UpdateResponse, protocol_catalog,
};
use crate::error::{DirectoryError, Result};
use std::sync::Arc;

/// System-initiated operations pushed by the game-logic servers.
///
/// Defaults to [`DispatchMode::Strict`]: an unhandled request type is an error.
#[derive(Clone)]
pub struct AdminService {
    dispatcher: Dispatcher,
}

impl AdminService {
    pub fn new(store: Arc<TournamentStore>) -> Self {
        Self::with_mode(store, DispatchMode::Strict)
    }

    pub fn with_mode(store: Arc<TournamentStore>, mode: DispatchMode) -> Self {
        let update_store = store.clone();
        let dispatcher = Dispatcher::builder("admin", mode, protocol_catalog())
            .register(move |request: UpdateRequest| {
                update_tournaments(update_store.clone(), request)
            })
            .register(move |request: CloseRequest| close_tournament(store.clone(), request))
            .build();
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub async fn handle(&self, envelope: &Envelope) -> Result<Response> {
        self.dispatcher.dispatch(envelope).await
    }
}

/// Applies the batch in order, one write per record.
///
/// The first failure stops the batch; records already written stay written.
async fn update_tournaments(
    store: Arc<TournamentStore>,
    request: UpdateRequest,
) -> Result<UpdateResponse> {
    let mut updated = 0;
    for (index, info) in request.infos.iter().enumerate() {
        let record = info.as_ref().ok_or_else(|| {
            DirectoryError::Validation(format!("tournament record at index {index} is missing"))
        })?;
        if let Err(e) = store.put(record).await {
            tracing::warn!(
                key = %record.storage_key(),
                written = updated,
                "Tournament update aborted: {}",
                e
            );
            return Err(e);
        }
        updated += 1;
    }
    Ok(UpdateResponse { updated })
}

async fn close_tournament(store: Arc<TournamentStore>, request: CloseRequest) -> Result<CloseResponse> {
    let removed = store.remove(&request.game_type, request.id).await?;
    Ok(CloseResponse { removed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::messages::ListRequest;
    use crate::domain::tournament::{TournamentQuery, TournamentRecord};
    use crate::infrastructure::in_memory::InMemoryKvStore;

    fn record(game_type: &str, id: i32) -> TournamentRecord {
        TournamentRecord {
            id,
            game_type: game_type.to_string(),
            ..Default::default()
        }
    }

    fn service() -> (AdminService, Arc<TournamentStore>) {
        let store = Arc::new(TournamentStore::new(Box::new(InMemoryKvStore::new())));
        (AdminService::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_update_writes_every_record() {
        let (service, store) = service();
        let request = Envelope::wrap(&UpdateRequest {
            infos: vec![Some(record("poker", 1)), Some(record("mahjong", 2))],
        })
        .unwrap();

        let ack = service.handle(&request).await.unwrap().ack.unwrap();
        assert_eq!(ack.unwrap_as::<UpdateResponse>().unwrap().updated, 2);
        assert_eq!(store.scan(&TournamentQuery::all()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_record_is_validation_error_and_stops_batch() {
        let (service, store) = service();
        let request = Envelope::wrap(&UpdateRequest {
            infos: vec![Some(record("poker", 1)), None, Some(record("poker", 3))],
        })
        .unwrap();

        let err = service.handle(&request).await.unwrap_err();
        assert!(matches!(err, DirectoryError::Validation(_)));

        let ids: Vec<i32> = store
            .scan(&TournamentQuery::all())
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![1]);
    }

    #[tokio::test]
    async fn test_player_request_is_unsupported() {
        let (service, _) = service();
        let request = Envelope::wrap(&ListRequest {
            game_type: "poker".to_string(),
        })
        .unwrap();
        let err = service.handle(&request).await.unwrap_err();
        assert!(matches!(err, DirectoryError::Unsupported(_)));
    }

    #[tokio::test]
    async fn test_close_releases_lease() {
        let (service, store) = service();
        store.put(&record("poker", 1)).await.unwrap();

        let close = Envelope::wrap(&CloseRequest {
            game_type: "poker".to_string(),
            id: 1,
        })
        .unwrap();
        let ack = service.handle(&close).await.unwrap().ack.unwrap();
        assert!(ack.unwrap_as::<CloseResponse>().unwrap().removed);

        let ack = service.handle(&close).await.unwrap().ack.unwrap();
        assert!(!ack.unwrap_as::<CloseResponse>().unwrap().removed);
    }
}
