pub mod mock;
pub mod notification_hub;
pub mod rest;
pub mod session;

pub use notification_hub::NotificationHub;
