use crate::{
    notification::{Account, ChannelClient, Device, Grant, IconLookup},
    push::{PushKind, PushRecord},
};

const ACCOUNT_IMAGE: &str = "https://example.com/account.png";
const CHANNEL_IMAGE: &str = "https://example.com/ifttt.png";

fn lookup() -> IconLookup {
    IconLookup {
        accounts: vec![Account {
            id: "ujpah72o0sjAoRtnM0jc".to_string(),
            image_url: Some(ACCOUNT_IMAGE.to_string()),
        }],
        grants: vec![Grant {
            client: ChannelClient {
                id: "client1".to_string(),
                image_url: Some(CHANNEL_IMAGE.to_string()),
            },
        }],
        devices: vec![Device {
            id: "device1".to_string(),
            icon: Some("phone".to_string()),
        }],
    }
}

/// WHAT: Mirror inline image wins over every table
/// WHY: The mirrored app icon is the most specific image
#[test]
fn given_mirror_with_icon_when_resolving_then_data_uri() {
    // Given: A mirror push that also matches a device
    let push = PushRecord {
        kind: PushKind::Mirror,
        icon: Some("AAAA".to_string()),
        source_device_iden: Some("device1".to_string()),
        ..PushRecord::default()
    };

    // When: Resolving the icon
    let icon = lookup().default_icon(&push);

    // Then: The inline image is used
    assert_eq!(icon.as_deref(), Some("data:image/jpeg;base64,AAAA"));
}

/// WHAT: Channel image beats device and account
/// WHY: Channel pushes should carry the channel's logo
#[test]
fn given_channel_and_device_match_when_resolving_then_channel_image() {
    let push = PushRecord {
        client_iden: Some("client1".to_string()),
        source_device_iden: Some("device1".to_string()),
        receiver_iden: Some("ujpah72o".to_string()),
        ..PushRecord::default()
    };

    assert_eq!(lookup().default_icon(&push).as_deref(), Some(CHANNEL_IMAGE));
}

/// WHAT: Device icons become hosted image URLs
/// WHY: Devices only carry an icon name
#[test]
fn given_device_match_when_resolving_then_device_icon_url() {
    let push = PushRecord {
        source_device_iden: Some("device1".to_string()),
        ..PushRecord::default()
    };

    assert_eq!(
        lookup().default_icon(&push).as_deref(),
        Some("http://www.pushbullet.com/img/deviceicons/phone.png")
    );
}

/// WHAT: Accounts match on id prefix
/// WHY: Pushes carry a shortened receiver id
#[test]
fn given_receiver_prefix_when_resolving_then_account_image() {
    let push = PushRecord {
        receiver_iden: Some("ujpah72o".to_string()),
        ..PushRecord::default()
    };

    assert_eq!(lookup().default_icon(&push).as_deref(), Some(ACCOUNT_IMAGE));
}

/// WHAT: No match yields no icon
/// WHY: Missing icons fall back to the notification default
#[test]
fn given_no_match_when_resolving_then_none() {
    let push = PushRecord {
        source_device_iden: Some("unknown".to_string()),
        ..PushRecord::default()
    };

    assert_eq!(lookup().default_icon(&push), None);
}
