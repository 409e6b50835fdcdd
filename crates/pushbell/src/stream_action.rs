use pushbell_core::{PushKind, PushRecord, StreamMessage};
use tracing::debug;

/// Tickle subtypes that invalidate the icon lookup tables.
const LOOKUP_SUBTYPES: [&str; 3] = ["device", "grant", "account"];

/// What the application loop does with a decoded stream message.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamAction {
    /// Fetch pushes modified since the last sync.
    SyncPushes,
    /// Refetch devices, grants and accounts.
    RefreshLookup,
    /// Display an ephemeral mirror immediately.
    ShowNow(PushRecord),
    /// Nothing to do.
    Ignore,
}

impl StreamAction {
    /// Decide how to react to `message`.
    pub fn for_message(message: StreamMessage) -> Self {
        if message.is_push_tickle() {
            return Self::SyncPushes;
        }

        match message {
            StreamMessage::Tickle { subtype } if LOOKUP_SUBTYPES.contains(&subtype.as_str()) => {
                Self::RefreshLookup
            }
            StreamMessage::Push { push } => match push.kind {
                PushKind::Mirror => Self::ShowNow(push),
                PushKind::Dismissal => {
                    debug!(push_id = %push.id, "Mirror dismissal ignored");
                    Self::Ignore
                }
                kind => {
                    debug!(?kind, "Ephemeral push ignored");
                    Self::Ignore
                }
            },
            other => {
                debug!(message = ?other, "Stream message ignored");
                Self::Ignore
            }
        }
    }
}
