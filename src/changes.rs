//! Change feed published after successful writes.
//!
//! Subscribers receive one JSON message per created, updated or deleted row
//! on a ZeroMQ PUB socket.

use std::sync::Mutex;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAction {
    Created,
    Updated,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeMessage {
    pub hub_id: i32,
    pub table: &'static str,
    pub action: ChangeAction,
    /// `None` for bulk writes touching several rows.
    pub id: Option<i32>,
}

impl ChangeMessage {
    pub fn new(hub_id: i32, table: &'static str, action: ChangeAction, id: i32) -> Self {
        Self {
            hub_id,
            table,
            action,
            id: Some(id),
        }
    }

    pub fn bulk(hub_id: i32, table: &'static str, action: ChangeAction) -> Self {
        Self {
            hub_id,
            table,
            action,
            id: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ChangeError {
    #[error("failed to encode change message: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("zeromq error: {0}")]
    Socket(#[from] zmq::Error),

    #[error("publisher socket lock is poisoned")]
    Poisoned,
}

#[cfg_attr(any(test, feature = "test-mocks"), mockall::automock)]
pub trait ChangeNotifier: Send + Sync {
    fn publish(&self, message: &ChangeMessage) -> Result<(), ChangeError>;
}

/// Publishes `message`, logging failures. The write it describes already succeeded.
pub fn notify(notifier: &dyn ChangeNotifier, message: ChangeMessage) {
    if let Err(err) = notifier.publish(&message) {
        log::warn!(
            "Failed to publish {:?} for {} {:?}: {err}",
            message.action,
            message.table,
            message.id
        );
    }
}

pub struct ZmqChangePublisher {
    socket: Mutex<zmq::Socket>,
}

impl ZmqChangePublisher {
    /// Binds a PUB socket to `endpoint` (for example `tcp://127.0.0.1:5560`).
    pub fn bind(endpoint: &str) -> Result<Self, ChangeError> {
        let context = zmq::Context::new();
        let socket = context.socket(zmq::PUB)?;
        socket.set_linger(0)?;
        socket.bind(endpoint)?;
        log::info!("Publishing changes on {endpoint}");
        Ok(Self {
            socket: Mutex::new(socket),
        })
    }
}

impl ChangeNotifier for ZmqChangePublisher {
    fn publish(&self, message: &ChangeMessage) -> Result<(), ChangeError> {
        let payload = serde_json::to_vec(message)?;
        let socket = self.socket.lock().map_err(|_| ChangeError::Poisoned)?;
        socket.send(payload, zmq::DONTWAIT)?;
        Ok(())
    }
}

/// Used when no change feed endpoint is configured.
pub struct NoopNotifier;

impl ChangeNotifier for NoopNotifier {
    fn publish(&self, _message: &ChangeMessage) -> Result<(), ChangeError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_serializes_as_flat_json() {
        let message = ChangeMessage::new(1, "news", ChangeAction::Updated, 7);
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"hub_id": 1, "table": "news", "action": "updated", "id": 7})
        );
    }

    #[test]
    fn bulk_message_has_null_id() {
        let json =
            serde_json::to_value(ChangeMessage::bulk(2, "branches", ChangeAction::Created)).unwrap();
        assert_eq!(json["id"], serde_json::Value::Null);
    }

    #[test]
    fn notify_swallows_publish_errors() {
        let mut notifier = MockChangeNotifier::new();
        notifier
            .expect_publish()
            .times(1)
            .returning(|_| Err(ChangeError::Poisoned));

        notify(
            &notifier,
            ChangeMessage::new(1, "branches", ChangeAction::Deleted, 3),
        );
    }

    #[test]
    fn publisher_binds_inproc_endpoint() {
        let publisher = ZmqChangePublisher::bind("inproc://changes-test").unwrap();
        publisher
            .publish(&ChangeMessage::new(1, "alerts", ChangeAction::Created, 1))
            .unwrap();
    }
}
