//! Frames of the realtime push stream.

use crate::{CoreResult, push::PushRecord};

use serde::Deserialize;

/// A decoded realtime stream frame.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamMessage {
    /// Keepalive sent by the server every few seconds.
    Nop,
    /// Something changed server-side; `subtype` names the collection.
    Tickle {
        /// Changed collection, e.g. `push` or `device`.
        #[serde(default)]
        subtype: String,
    },
    /// An ephemeral push delivered inline (mirrors, dismissals).
    Push {
        /// The pushed record.
        push: PushRecord,
    },
    /// Any frame type this client ignores.
    #[serde(other)]
    Unknown,
}

impl StreamMessage {
    /// Decode a text frame.
    #[track_caller]
    pub fn parse(text: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Whether this frame says the push collection changed.
    pub fn is_push_tickle(&self) -> bool {
        matches!(self, StreamMessage::Tickle { subtype } if subtype == "push")
    }
}
