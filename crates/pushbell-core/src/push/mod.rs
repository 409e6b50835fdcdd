mod record;
mod selector;
mod store;
mod stream;

pub use {
    record::{PushKind, PushRecord},
    selector::select_recent,
    store::PushStore,
    stream::StreamMessage,
};
