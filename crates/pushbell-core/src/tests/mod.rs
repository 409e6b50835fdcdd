mod notification;
mod push;
mod support;
