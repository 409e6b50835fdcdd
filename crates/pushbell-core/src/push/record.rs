use serde::{Deserialize, Serialize};

/// Push type, decoded from the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PushKind {
    /// Plain text note.
    #[default]
    Note,
    /// Web link.
    Link,
    /// Uploaded file.
    File,
    /// Notification mirrored from another device.
    Mirror,
    /// Dismissal of a mirrored notification.
    Dismissal,
    /// Any type this client does not know about.
    #[serde(other)]
    Unknown,
}

/// A single notification-worthy event from the service.
///
/// Every display field is optional; missing values are back-filled by the
/// mapper instead of rejecting the record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PushRecord {
    /// Unique identifier, key of the push collection.
    #[serde(rename = "iden", default)]
    pub id: String,
    /// Push type.
    #[serde(rename = "type", default)]
    pub kind: PushKind,
    /// Creation time in seconds since epoch.
    #[serde(default)]
    pub created: f64,
    /// Last modification time in seconds since epoch.
    #[serde(default)]
    pub modified: f64,
    /// Only active pushes are eligible for display.
    #[serde(default)]
    pub active: bool,
    /// Title, if any.
    #[serde(default)]
    pub title: Option<String>,
    /// Body text, if any.
    #[serde(default)]
    pub body: Option<String>,
    /// Link target for `link` pushes.
    #[serde(default)]
    pub url: Option<String>,
    /// File name for `file` pushes.
    #[serde(default)]
    pub file_name: Option<String>,
    /// MIME type for `file` pushes.
    #[serde(default)]
    pub file_type: Option<String>,
    /// Download URL for `file` pushes.
    #[serde(default)]
    pub file_url: Option<String>,
    /// Preview image for `file` and `mirror` pushes.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Originating application for `mirror` pushes.
    #[serde(default)]
    pub application_name: Option<String>,
    /// Base64 JPEG icon embedded in `mirror` pushes.
    #[serde(default)]
    pub icon: Option<String>,
    /// Receiving account id (prefix match against accounts).
    #[serde(default)]
    pub receiver_iden: Option<String>,
    /// Sending client id (channels such as IFTTT).
    #[serde(default)]
    pub client_iden: Option<String>,
    /// Sending device id.
    #[serde(default)]
    pub source_device_iden: Option<String>,
}

impl PushRecord {
    /// The later of `created` and `modified`.
    pub fn latest_timestamp(&self) -> f64 {
        self.created.max(self.modified)
    }

    /// Whether this push is a mirrored notification.
    pub fn is_mirror(&self) -> bool {
        self.kind == PushKind::Mirror
    }
}
