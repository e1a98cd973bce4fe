pub mod native;
pub mod web;
pub mod mock;

pub use native::{NativeEventChannels, NativePushBridge, RegistrationErrorEvent, TokenEvent};
pub use web::{BrowserPermissions, MessagingClient};
pub use mock::{MockBrowser, MockMessagingClient, MockNativeBridge};
