//! Control-plane messages between pages and the proxy.

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::error::Result;

/// A control message sent by a page.
///
/// Wire shape is `{"type": "..."}`; unrecognized types decode to
/// [`Unknown`](ControlMessage::Unknown) and are ignored by the proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ControlMessage {
    /// Activate this proxy version immediately
    #[serde(rename = "SKIP_WAITING")]
    SkipWaiting,

    /// Ask for the current cache generation identifier
    #[serde(rename = "GET_VERSION")]
    GetVersion,

    /// Any other message type
    #[serde(other)]
    Unknown,
}

impl ControlMessage {
    /// Decode a message from its JSON wire form.
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Reply to a [`ControlMessage::GetVersion`] query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionReply {
    /// Current cache generation identifier
    pub version: String,
}

/// A control message together with its caller-supplied reply channel.
#[derive(Debug)]
pub struct MessageEvent {
    /// The decoded message
    pub data: ControlMessage,

    /// Reply port for query messages; queries without one get no answer
    pub reply_port: Option<oneshot::Sender<VersionReply>>,
}

impl MessageEvent {
    /// A message with no reply channel.
    pub fn new(data: ControlMessage) -> Self {
        Self {
            data,
            reply_port: None,
        }
    }

    /// A message with a reply channel; returns the receiving half.
    pub fn with_reply(data: ControlMessage) -> (Self, oneshot::Receiver<VersionReply>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                data,
                reply_port: Some(tx),
            },
            rx,
        )
    }
}
