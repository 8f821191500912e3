//! Type-routed request dispatch.
//!
//! A [`Dispatcher`] decodes an inbound [`Envelope`] through the protocol's
//! [`MessageCatalog`], finds the handler registered for the decoded type, runs
//! it in its own task, and wraps the result into a [`Response`].
//!
//! The handler map is assembled once with [`DispatcherBuilder`] and is
//! read-only afterwards, so a `Dispatcher` can be cloned into any number of
//! concurrent request tasks without locking.

use crate::domain::envelope::{Envelope, Message, MessageCatalog, Response};
use crate::error::{DirectoryError, Result};
use crate::telemetry::panic_message;
use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::task::JoinHandle;

pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Envelope>> + Send>>;

/// Type-erased handler: takes the decoded request, yields the encoded response.
pub type HandlerFn = Arc<dyn Fn(Box<dyn Any + Send>) -> HandlerFuture + Send + Sync>;

/// What to do with a well-formed request nobody registered a handler for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// Answer with an empty response.
    Lenient,
    /// Fail with [`DirectoryError::Unsupported`].
    Strict,
}

/// Downcasts and runs one handler call. The handler itself is only invoked
/// when this future is first polled, so all of it runs inside the task.
async fn invoke<Req, Resp, F, Fut>(handler: Arc<F>, message: Box<dyn Any + Send>) -> Result<Envelope>
where
    Req: Message,
    Resp: Message,
    F: Fn(Req) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Resp>> + Send + 'static,
{
    let request = message.downcast::<Req>().map_err(|_| DirectoryError::Decode {
        type_id: Req::TYPE_ID.to_string(),
        reason: "decoded message has an unexpected type".to_string(),
    })?;
    let response = (*handler)(*request).await?;
    Envelope::wrap(&response)
}

pub struct DispatcherBuilder {
    name: &'static str,
    mode: DispatchMode,
    catalog: MessageCatalog,
    handlers: HashMap<&'static str, HandlerFn>,
}

impl DispatcherBuilder {
    /// Registers `handler` for requests of type `Req`.
    ///
    /// Registering the same request type twice keeps the last handler.
    pub fn register<Req, Resp, F, Fut>(mut self, handler: F) -> Self
    where
        Req: Message,
        Resp: Message,
        F: Fn(Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Resp>> + Send + 'static,
    {
        let handler = Arc::new(handler);
        let handler_fn: HandlerFn = Arc::new(move |message: Box<dyn Any + Send>| {
            Box::pin(invoke::<Req, Resp, F, Fut>(handler.clone(), message)) as HandlerFuture
        });

        if self.handlers.insert(Req::TYPE_ID, handler_fn).is_some() {
            tracing::warn!(
                service = self.name,
                "Handler for {} registered twice; keeping the last one",
                Req::TYPE_ID
            );
        }
        self
    }

    pub fn build(self) -> Dispatcher {
        tracing::debug!(
            service = self.name,
            mode = ?self.mode,
            handlers = self.handlers.len(),
            "Dispatcher ready"
        );
        Dispatcher {
            inner: Arc::new(Inner {
                name: self.name,
                mode: self.mode,
                catalog: self.catalog,
                handlers: self.handlers,
            }),
        }
    }
}

struct Inner {
    name: &'static str,
    mode: DispatchMode,
    catalog: MessageCatalog,
    handlers: HashMap<&'static str, HandlerFn>,
}

#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<Inner>,
}

/// Aborts the handler task if the dispatch future is dropped before it ends.
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

impl Dispatcher {
    pub fn builder(name: &'static str, mode: DispatchMode, catalog: MessageCatalog) -> DispatcherBuilder {
        DispatcherBuilder {
            name,
            mode,
            catalog,
            handlers: HashMap::new(),
        }
    }

    /// Request types with a registered handler, sorted.
    pub fn registered_types(&self) -> Vec<&'static str> {
        let mut types: Vec<_> = self.inner.handlers.keys().copied().collect();
        types.sort_unstable();
        types
    }

    /// Decodes, routes and runs one request.
    ///
    /// A panicking handler is contained: it is logged, this call fails with
    /// [`DirectoryError::HandlerFault`], and later calls are unaffected.
    pub async fn dispatch(&self, envelope: &Envelope) -> Result<Response> {
        let inner = &self.inner;
        let message = inner.catalog.decode(envelope)?;
        tracing::info!(service = inner.name, request = ?message, "Dispatching request");

        let type_id = message.type_id_str();
        let Some(handler) = inner.handlers.get(type_id) else {
            return match inner.mode {
                DispatchMode::Lenient => {
                    tracing::debug!(service = inner.name, type_id, "No handler; answering empty");
                    Ok(Response::empty())
                }
                DispatchMode::Strict => Err(DirectoryError::Unsupported(type_id.to_string())),
            };
        };

        let mut task = AbortOnDrop(tokio::spawn(handler(message.into_any())));
        match (&mut task.0).await {
            Ok(result) => Ok(Response { ack: Some(result?) }),
            Err(join_error) if join_error.is_panic() => {
                let reason = panic_message(&*join_error.into_panic());
                tracing::error!(service = inner.name, type_id, panic = %reason, "Handler panicked");
                Err(DirectoryError::HandlerFault(reason))
            }
            Err(join_error) => Err(DirectoryError::HandlerFault(join_error.to_string())),
        }
    }
}
