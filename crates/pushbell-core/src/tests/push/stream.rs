use crate::push::{PushKind, StreamMessage};

/// WHAT: Keepalive frames decode to Nop
/// WHY: The listener must recognise heartbeats
#[test]
fn given_nop_frame_when_parsing_then_nop() {
    let message = StreamMessage::parse(r#"{"type":"nop"}"#).unwrap();
    assert_eq!(message, StreamMessage::Nop);
}

/// WHAT: Push tickles are recognised
/// WHY: A tickle triggers a re-fetch of changed pushes
#[test]
fn given_push_tickle_when_parsing_then_is_push_tickle() {
    // Given/When: A push tickle frame
    let message = StreamMessage::parse(r#"{"type":"tickle","subtype":"push"}"#).unwrap();

    // Then: It is a push tickle, a device tickle is not
    assert!(message.is_push_tickle());
    let device = StreamMessage::parse(r#"{"type":"tickle","subtype":"device"}"#).unwrap();
    assert!(!device.is_push_tickle());
}

/// WHAT: Inline mirror pushes decode with their fields
/// WHY: Mirrors are shown straight from the stream
#[test]
fn given_mirror_frame_when_parsing_then_push_fields_are_decoded() {
    // Given: A mirror push frame
    let frame = r#"{
        "type": "push",
        "push": {
            "type": "mirror",
            "iden": "m1",
            "application_name": "Signal",
            "title": "Alice",
            "body": "lunch?",
            "icon": "AAAA"
        }
    }"#;

    // When: Parsing
    let message = StreamMessage::parse(frame).unwrap();

    // Then: The push is decoded
    let StreamMessage::Push { push } = message else {
        panic!("expected push frame");
    };
    assert_eq!(push.kind, PushKind::Mirror);
    assert_eq!(push.application_name.as_deref(), Some("Signal"));
    assert!(!push.active);
}

/// WHAT: Unknown frame and push types do not fail
/// WHY: New server features must not break the client
#[test]
fn given_unknown_types_when_parsing_then_unknown() {
    let message = StreamMessage::parse(r#"{"type":"ephemeral_v9"}"#).unwrap();
    assert_eq!(message, StreamMessage::Unknown);

    let push = StreamMessage::parse(r#"{"type":"push","push":{"type":"sms_changed"}}"#).unwrap();
    assert!(matches!(
        push,
        StreamMessage::Push { push } if push.kind == PushKind::Unknown
    ));
}

/// WHAT: Malformed JSON is reported as a decode error
/// WHY: The listener logs and drops bad frames
#[test]
fn given_malformed_frame_when_parsing_then_error() {
    let result = StreamMessage::parse("{not json");
    assert!(matches!(result, Err(crate::PushError::StreamDecode { .. })));
}
