use pushbell_core::StreamMessage;

/// Commands delivered to the main application loop.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// A decoded frame from the push stream.
    Stream(StreamMessage),
    /// The push stream connected (`true`) or dropped (`false`).
    StreamConnected(bool),
    /// Request application shutdown.
    Shutdown,
}
