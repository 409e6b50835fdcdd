mod selector;
mod store;
mod stream;
