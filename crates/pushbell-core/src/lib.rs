//! Pushbell Core Library
//!
//! Push de-duplication, selection, mapping to desktop notifications, paced
//! delivery and persisted preferences for the Pushbell tray client.
//!
//! # Example
//!
//! ```no_run
//! use pushbell_core::{
//!     CoreResult, Notification, NotificationSink, PipelineParts, PushPipeline, PushRecord,
//!     SettingsStore, Throttler, default_settings,
//! };
//!
//! struct StdoutSink;
//!
//! impl NotificationSink for StdoutSink {
//!     fn show(&self, notification: &Notification) -> CoreResult<()> {
//!         println!("{}: {}", notification.title, notification.body);
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> CoreResult<()> {
//!     let settings = SettingsStore::open("settings.toml".into(), default_settings("0.1.0"))?;
//!     let (pipeline, _task) = PushPipeline::spawn(PipelineParts {
//!         settings,
//!         sink: Box::new(StdoutSink),
//!         throttler: Throttler::default(),
//!         max_recent: 10,
//!     });
//!
//!     let push: PushRecord = serde_json::from_str(
//!         r#"{"iden":"a1","type":"note","active":true,"created":1.0,"modified":1.0e10,"title":"Hi"}"#,
//!     )?;
//!     pipeline.admit(push).await?;
//!     pipeline.shutdown().await
//! }
//! ```

mod error;
pub mod notification;
pub mod pipeline;
pub mod push;
pub mod settings;
pub mod throttle;

pub use {
    error::{PushError, Result as CoreResult},
    notification::{IconLookup, Notification, NotificationSink},
    pipeline::{PipelineHandle, PipelineParts, PushPipeline},
    push::{PushKind, PushRecord, StreamMessage},
    settings::{SettingsStore, default_settings},
    throttle::Throttler,
};

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests;
