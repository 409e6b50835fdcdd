mod lookup;
mod mapper;
mod presenter;
mod tags;

pub use {
    lookup::{Account, ChannelClient, Device, Grant, IconLookup},
    mapper::{Notification, to_notification},
    presenter::{NotificationSink, Presenter},
    tags::{TagDictionary, format_tags, remove_tags},
};
