pub mod types;
pub mod sink;
pub mod bridge;
pub mod strategy;
pub mod session;

pub use types::{
    NativePayload, NormalizedNotification, PermissionStatus, WebNotification, WebPayload,
};
pub use sink::{ChannelSink, LogSink, PushSink};
pub use session::{PushRegistrar, PushRegistrarBuilder, TokenNotifier};
pub use strategy::{NativeStrategy, RegisterStrategy, WebStrategy};
