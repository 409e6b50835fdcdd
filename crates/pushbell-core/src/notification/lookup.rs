use crate::push::{PushKind, PushRecord};

use serde::Deserialize;

const DEVICE_ICON_BASE_URL: &str = "http://www.pushbullet.com/img/deviceicons/";

/// Linked account (Google, Facebook, ...).
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Account {
    /// Account id.
    #[serde(rename = "iden")]
    pub id: String,
    /// Avatar URL.
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Channel client that was granted access (IFTTT, Zapier, ...).
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ChannelClient {
    /// Client id.
    #[serde(rename = "iden")]
    pub id: String,
    /// Client logo URL.
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Access grant wrapping a channel client.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Grant {
    /// The client this grant belongs to.
    pub client: ChannelClient,
}

/// Registered device (phone, tablet, browser, ...).
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Device {
    /// Device id.
    #[serde(rename = "iden")]
    pub id: String,
    /// Icon name, e.g. `phone` or `laptop`.
    #[serde(default)]
    pub icon: Option<String>,
}

/// Auxiliary tables used to pick a notification icon.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IconLookup {
    /// Linked accounts.
    pub accounts: Vec<Account>,
    /// Channel grants.
    pub grants: Vec<Grant>,
    /// Devices.
    pub devices: Vec<Device>,
}

impl IconLookup {
    /// Resolve the default icon for `push`.
    ///
    /// Order: mirror inline image, channel image, device icon, account image.
    /// When several entries of one table match, the last one wins.
    pub fn default_icon(&self, push: &PushRecord) -> Option<String> {
        self.mirror_image(push)
            .or_else(|| self.channel_image(push))
            .or_else(|| self.device_image(push))
            .or_else(|| self.account_image(push))
    }

    fn mirror_image(&self, push: &PushRecord) -> Option<String> {
        if push.kind != PushKind::Mirror {
            return None;
        }
        push.icon
            .as_deref()
            .filter(|icon| !icon.is_empty())
            .map(|icon| format!("data:image/jpeg;base64,{icon}"))
    }

    fn channel_image(&self, push: &PushRecord) -> Option<String> {
        let client_id = push.client_iden.as_deref()?;
        self.grants
            .iter()
            .rev()
            .find(|grant| grant.client.id == client_id)
            .and_then(|grant| grant.client.image_url.clone())
    }

    fn device_image(&self, push: &PushRecord) -> Option<String> {
        let device_id = push.source_device_iden.as_deref()?;
        self.devices
            .iter()
            .rev()
            .find(|device| device.id == device_id)
            .and_then(|device| device.icon.as_deref())
            .map(|icon| format!("{DEVICE_ICON_BASE_URL}{icon}.png"))
    }

    fn account_image(&self, push: &PushRecord) -> Option<String> {
        let receiver = push.receiver_iden.as_deref()?;
        self.accounts
            .iter()
            .rev()
            .find(|account| account.id.starts_with(receiver))
            .and_then(|account| account.image_url.clone())
    }
}
