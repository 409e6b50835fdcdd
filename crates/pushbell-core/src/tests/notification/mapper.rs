use crate::{
    notification::{IconLookup, TagDictionary, to_notification},
    push::{PushKind, PushRecord},
};

fn map(push: &PushRecord) -> crate::Notification {
    to_notification(push, &IconLookup::default(), &TagDictionary::default())
}

/// WHAT: File pushes back-fill title, body and url from file fields
/// WHY: File pushes usually have no title or body
#[test]
fn given_file_push_when_mapping_then_file_fields_fill_in() {
    // Given: A file push with only file fields
    let push = PushRecord {
        id: "f1".to_string(),
        kind: PushKind::File,
        file_name: Some("a.png".to_string()),
        file_type: Some("image/png".to_string()),
        file_url: Some("http://x/a.png".to_string()),
        ..PushRecord::default()
    };

    // When: Mapping
    let notification = map(&push);

    // Then: File fields are used
    assert_eq!(notification.title, "a.png");
    assert_eq!(notification.body, "image/png");
    assert_eq!(notification.url.as_deref(), Some("http://x/a.png"));
    assert_eq!(notification.tag.as_deref(), Some("f1"));
    assert!(notification.silent);
}

/// WHAT: File image overrides the default icon
/// WHY: A preview of the file is the best icon
#[test]
fn given_file_with_image_when_mapping_then_image_is_icon() {
    let push = PushRecord {
        kind: PushKind::File,
        image_url: Some("http://x/thumb.png".to_string()),
        ..PushRecord::default()
    };

    assert_eq!(map(&push).icon.as_deref(), Some("http://x/thumb.png"));
}

/// WHAT: Link pushes fall back to the url for title and body
/// WHY: Bare links still need readable text
#[test]
fn given_bare_link_when_mapping_then_url_fills_title_body_and_url() {
    let push = PushRecord {
        kind: PushKind::Link,
        url: Some("https://rust-lang.org".to_string()),
        ..PushRecord::default()
    };

    let notification = map(&push);

    assert_eq!(notification.title, "https://rust-lang.org");
    assert_eq!(notification.body, "https://rust-lang.org");
    assert_eq!(notification.url.as_deref(), Some("https://rust-lang.org"));
}

/// WHAT: Note with only a title shows it as title and body
/// WHY: Body back-fills from title
#[test]
fn given_note_with_title_only_when_mapping_then_body_uses_title() {
    let push = PushRecord {
        kind: PushKind::Note,
        title: Some("Groceries".to_string()),
        ..PushRecord::default()
    };

    let notification = map(&push);

    assert_eq!(notification.title, "Groceries");
    assert_eq!(notification.body, "Groceries");
    assert_eq!(notification.url, None);
}

/// WHAT: Mirror titles are prefixed with the application name
/// WHY: The user needs to know which app mirrored the notification
#[test]
fn given_mirror_when_mapping_then_title_has_application_prefix() {
    let push = PushRecord {
        kind: PushKind::Mirror,
        application_name: Some("Signal".to_string()),
        title: Some("Alice".to_string()),
        body: Some("lunch?".to_string()),
        ..PushRecord::default()
    };

    let notification = map(&push);

    assert_eq!(notification.title, "Signal: Alice");
    assert_eq!(notification.body, "lunch?");
}

/// WHAT: Title keeps tag glyphs, body loses tags
/// WHY: Glyphs decorate the title only
#[test]
fn given_tags_in_title_and_body_when_mapping_then_asymmetric_handling() {
    let push = PushRecord {
        kind: PushKind::Note,
        title: Some("{social} New entry".to_string()),
        body: Some("{social} New entry at reddit".to_string()),
        ..PushRecord::default()
    };

    let notification = map(&push);

    assert_eq!(notification.title, "🍻 New entry");
    assert_eq!(notification.body, "New entry at reddit");
}

/// WHAT: Empty push maps to blank fields
/// WHY: Malformed records degrade, never fail
#[test]
fn given_empty_push_when_mapping_then_blank_notification() {
    let notification = map(&PushRecord::default());

    assert_eq!(notification.title, "");
    assert_eq!(notification.body, "");
    assert_eq!(notification.tag, None);
    assert_eq!(notification.icon, None);
}
