use crate::error::{DirectoryError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::HashMap;
use std::fmt::Debug;

/// A concrete message schema that can travel inside an [`Envelope`].
///
/// `TYPE_ID` must be unique across every message of the protocol.
pub trait Message: Serialize + DeserializeOwned + Debug + Send + 'static {
    const TYPE_ID: &'static str;
}

/// Self-describing container: a type tag plus the encoded message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub type_id: String,
    pub payload: Vec<u8>,
}

impl Envelope {
    pub fn wrap<M: Message>(message: &M) -> Result<Self> {
        Ok(Self {
            type_id: M::TYPE_ID.to_string(),
            payload: serde_json::to_vec(message)?,
        })
    }

    /// Decodes the payload as `M`, checking the tag first.
    pub fn unwrap_as<M: Message>(&self) -> Result<M> {
        if self.type_id != M::TYPE_ID {
            return Err(DirectoryError::Decode {
                type_id: self.type_id.clone(),
                reason: format!("expected '{}'", M::TYPE_ID),
            });
        }
        serde_json::from_slice(&self.payload).map_err(|e| DirectoryError::Decode {
            type_id: self.type_id.clone(),
            reason: e.to_string(),
        })
    }
}

/// Reply to a dispatched envelope. `ack` is `None` when a lenient dispatcher
/// had nothing registered for the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub ack: Option<Envelope>,
}

impl Response {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ack.is_none()
    }
}

/// A decoded message with its concrete type erased.
pub trait DynMessage: Debug + Send {
    fn type_id_str(&self) -> &'static str;
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send>;
}

impl<M: Message> DynMessage for M {
    fn type_id_str(&self) -> &'static str {
        M::TYPE_ID
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}

type DecodeFn = fn(&[u8]) -> serde_json::Result<Box<dyn DynMessage>>;

fn decode_boxed<M: Message>(payload: &[u8]) -> serde_json::Result<Box<dyn DynMessage>> {
    Ok(Box::new(serde_json::from_slice::<M>(payload)?))
}

/// Every message schema known to the protocol, keyed by type id.
///
/// Knowing a schema is separate from handling it: a dispatcher decodes any
/// cataloged message and only then decides whether it has a handler.
#[derive(Clone, Default)]
pub struct MessageCatalog {
    decoders: HashMap<&'static str, DecodeFn>,
}

impl MessageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<M: Message>(mut self) -> Self {
        self.decoders.insert(M::TYPE_ID, decode_boxed::<M>);
        self
    }

    pub fn decode(&self, envelope: &Envelope) -> Result<Box<dyn DynMessage>> {
        let decode = self
            .decoders
            .get(envelope.type_id.as_str())
            .ok_or_else(|| DirectoryError::Decode {
                type_id: envelope.type_id.clone(),
                reason: "unknown message type".to_string(),
            })?;
        decode(&envelope.payload).map_err(|e| DirectoryError::Decode {
            type_id: envelope.type_id.clone(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Ping {
        seq: u32,
    }

    impl Message for Ping {
        const TYPE_ID: &'static str = "test.Ping";
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Pong {
        seq: u32,
    }

    impl Message for Pong {
        const TYPE_ID: &'static str = "test.Pong";
    }

    #[test]
    fn test_wrap_embeds_type_id() {
        let envelope = Envelope::wrap(&Ping { seq: 3 }).unwrap();
        assert_eq!(envelope.type_id, "test.Ping");
        assert_eq!(envelope.unwrap_as::<Ping>().unwrap(), Ping { seq: 3 });
    }

    #[test]
    fn test_unwrap_as_wrong_type_is_decode_error() {
        let envelope = Envelope::wrap(&Ping { seq: 3 }).unwrap();
        let err = envelope.unwrap_as::<Pong>().unwrap_err();
        assert!(matches!(err, DirectoryError::Decode { type_id, .. } if type_id == "test.Ping"));
    }

    #[test]
    fn test_unwrap_as_garbage_payload_is_decode_error() {
        let envelope = Envelope {
            type_id: "test.Ping".to_string(),
            payload: b"not json".to_vec(),
        };
        assert!(matches!(
            envelope.unwrap_as::<Ping>(),
            Err(DirectoryError::Decode { .. })
        ));
    }

    #[test]
    fn test_catalog_decodes_known_and_rejects_unknown() {
        let catalog = MessageCatalog::new().with::<Ping>();
        let decoded = catalog.decode(&Envelope::wrap(&Ping { seq: 1 }).unwrap()).unwrap();
        assert_eq!(decoded.type_id_str(), "test.Ping");

        let err = catalog
            .decode(&Envelope::wrap(&Pong { seq: 1 }).unwrap())
            .err()
            .unwrap();
        assert!(matches!(err, DirectoryError::Decode { reason, .. } if reason == "unknown message type"));
    }

    #[test]
    fn test_dyn_message_downcasts_back() {
        let boxed: Box<dyn DynMessage> = Box::new(Ping { seq: 9 });
        assert_eq!(boxed.type_id_str(), "test.Ping");
        let any = boxed.into_any();
        assert_eq!(*any.downcast::<Ping>().unwrap(), Ping { seq: 9 });
    }
}
