use crate::{
    notification::{IconLookup, TagDictionary, format_tags, remove_tags},
    push::{PushKind, PushRecord},
};

use std::path::PathBuf;

/// A native desktop notification ready for display.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Notification {
    /// Summary line, tags rendered as glyphs.
    pub title: String,
    /// Body text, tags removed.
    pub body: String,
    /// Opened when the notification is clicked.
    pub url: Option<String>,
    /// Icon URL or data URI.
    pub icon: Option<String>,
    /// Replacement tag (the push id).
    pub tag: Option<String>,
    /// Suppress the notification server's own sound.
    pub silent: bool,
    /// Sound file the application plays alongside the notification.
    pub sound: Option<PathBuf>,
}

/// Map a push to a notification, back-filling fields by push kind.
pub fn to_notification(
    push: &PushRecord,
    lookup: &IconLookup,
    tags: &TagDictionary,
) -> Notification {
    let mut title = first_present([&push.title, &push.body]);
    let mut body = first_present([&push.body, &push.title]);
    let mut url = None;
    let mut icon = lookup.default_icon(push);

    match push.kind {
        PushKind::Link => {
            title = title.or_else(|| present(&push.url));
            body = body.or_else(|| present(&push.url));
            url = present(&push.url);
        }
        PushKind::Note => {
            body = first_present([&push.body, &push.title]);
        }
        PushKind::File => {
            title = title.or_else(|| present(&push.file_name));
            body = body.or_else(|| present(&push.file_type));
            url = present(&push.file_url);
            icon = present(&push.image_url).or(icon);
        }
        PushKind::Mirror => {
            title = Some(format!(
                "{}: {}",
                push.application_name.as_deref().unwrap_or_default(),
                push.title.as_deref().unwrap_or_default()
            ));
            body = body.or_else(|| present(&push.title));
            url = present(&push.file_url);
            icon = present(&push.image_url).or(icon);
        }
        PushKind::Dismissal | PushKind::Unknown => {}
    }

    Notification {
        title: format_tags(&title.unwrap_or_default(), tags)
            .trim()
            .to_string(),
        body: remove_tags(&body.unwrap_or_default(), tags)
            .trim()
            .to_string(),
        url,
        icon,
        tag: Some(push.id.clone()).filter(|id| !id.is_empty()),
        silent: true,
        sound: None,
    }
}

fn present(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|v| !v.is_empty()).map(str::to_string)
}

fn first_present<const N: usize>(candidates: [&Option<String>; N]) -> Option<String> {
    candidates.into_iter().find_map(present)
}
