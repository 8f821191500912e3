use super::dispatcher::{DispatchMode, Dispatcher};
use super::store::TournamentStore;
use crate::domain::envelope::{Envelope, Response};
use crate::domain::messages::{ListRequest, ListResponse, protocol_catalog};
use crate::domain::tournament::{TournamentQuery, TournamentSummary};
use crate::error::Result;
use std::sync::Arc;

/// Player-initiated operations.
///
/// Defaults to [`DispatchMode::Lenient`]: a request this service has no
/// handler for gets an empty answer instead of an error.
#[derive(Clone)]
pub struct PlayerService {
    dispatcher: Dispatcher,
}

impl PlayerService {
    pub fn new(store: Arc<TournamentStore>) -> Self {
        Self::with_mode(store, DispatchMode::Lenient)
    }

    pub fn with_mode(store: Arc<TournamentStore>, mode: DispatchMode) -> Self {
        let dispatcher = Dispatcher::builder("player", mode, protocol_catalog())
            .register(move |request: ListRequest| list_tournaments(store.clone(), request))
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

async fn list_tournaments(store: Arc<TournamentStore>, request: ListRequest) -> Result<ListResponse> {
    let records = store
        .scan(&TournamentQuery::game_type(request.game_type))
        .await?;
    Ok(ListResponse {
        tournaments: records.into_iter().map(TournamentSummary::from).collect(),
    })
}
