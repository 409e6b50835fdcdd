use crate::{
    notification::Presenter,
    push::{PushKind, PushRecord},
    settings::{ENABLE_SOUND, NOTIFICATION_FILE, SNOOZE_NOTIFICATIONS},
    tests::support::{FailingSink, RecordingSink, note, temp_settings},
};

use std::path::PathBuf;

/// WHAT: Active pushes are shown
/// WHY: Baseline for the eligibility rules
#[tokio::test]
async fn given_active_push_when_presenting_then_shown() {
    // Given: A presenter with a recording sink
    let (_dir, _path, settings) = temp_settings();
    let sink = RecordingSink::default();
    let presenter = Presenter::new(Box::new(sink.clone()), settings);

    // When: Presenting an active note
    let shown = presenter.present(&note("a", 1.0));

    // Then: It reaches the sink
    assert!(shown);
    assert_eq!(sink.titles(), vec!["Note a".to_string()]);
}

/// WHAT: Snoozing suppresses every notification
/// WHY: The tray toggle must silence the desktop
#[tokio::test]
async fn given_snoozed_when_presenting_then_not_shown() {
    let (_dir, _path, settings) = temp_settings();
    settings.set(SNOOZE_NOTIFICATIONS, true).unwrap();
    let sink = RecordingSink::default();
    let presenter = Presenter::new(Box::new(sink.clone()), settings);

    let shown = presenter.present(&note("a", 1.0));

    assert!(!shown);
    assert!(sink.titles().is_empty());
}

/// WHAT: Inactive pushes are skipped unless they are mirrors
/// WHY: Mirrors are ephemeral and never marked active
#[tokio::test]
async fn given_inactive_note_and_mirror_when_presenting_then_only_mirror_shown() {
    // Given: An inactive note and an inactive mirror
    let (_dir, _path, settings) = temp_settings();
    let sink = RecordingSink::default();
    let presenter = Presenter::new(Box::new(sink.clone()), settings);

    let mut inactive = note("a", 1.0);
    inactive.active = false;
    let mirror = PushRecord {
        id: "m".to_string(),
        kind: PushKind::Mirror,
        application_name: Some("Signal".to_string()),
        title: Some("Bob".to_string()),
        ..PushRecord::default()
    };

    // When: Presenting both
    let note_shown = presenter.present(&inactive);
    let mirror_shown = presenter.present(&mirror);

    // Then: Only the mirror is shown
    assert!(!note_shown);
    assert!(mirror_shown);
    assert_eq!(sink.titles(), vec!["Signal: Bob".to_string()]);
}

/// WHAT: Sound file is attached only when sound is enabled
/// WHY: The application plays the sound itself
#[tokio::test]
async fn given_sound_setting_when_presenting_then_sound_follows_preference() {
    // Given: A configured notification sound
    let (_dir, _path, settings) = temp_settings();
    settings.set(NOTIFICATION_FILE, "/tmp/ding.wav").unwrap();
    let sink = RecordingSink::default();
    let presenter = Presenter::new(Box::new(sink.clone()), settings.clone());

    // When: Presenting with sound enabled, then disabled
    presenter.present(&note("a", 1.0));
    settings.set(ENABLE_SOUND, false).unwrap();
    presenter.present(&note("b", 2.0));

    // Then: Only the first notification carries the sound
    let shown = sink.shown.lock().unwrap();
    assert_eq!(shown[0].sound, Some(PathBuf::from("/tmp/ding.wav")));
    assert_eq!(shown[1].sound, None);
}

/// WHAT: Sink failures are reported as not shown
/// WHY: Display errors are logged, never fatal
#[tokio::test]
async fn given_failing_sink_when_presenting_then_not_shown() {
    let (_dir, _path, settings) = temp_settings();
    let presenter = Presenter::new(Box::new(FailingSink), settings);

    assert!(!presenter.present(&note("a", 1.0)));
}
