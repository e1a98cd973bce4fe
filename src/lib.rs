pub mod config;
pub mod error;
pub mod logging;
pub mod platform;
pub mod push;

pub use config::PushConfig;
pub use error::{RegistrarError, Result};
pub use platform::{FixedPlatform, Platform, PlatformDetector};
pub use push::{
    NativePayload, NormalizedNotification, PermissionStatus, PushRegistrar,
    PushRegistrarBuilder, PushSink, WebNotification, WebPayload,
};
