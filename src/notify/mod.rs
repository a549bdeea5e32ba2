//! Notification delivery
//!
//! Discord webhooks are the only delivery channel; owners without a
//! webhook simply do not get notified.

pub mod discord;

pub use discord::DiscordAlert;
