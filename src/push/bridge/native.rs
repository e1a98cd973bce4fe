use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use crate::error::Result;
use crate::push::types::{NativePayload, PermissionStatus};

/// 原生桥注册成功事件（携带平台签发的 token）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenEvent {
    pub value: String,
}

/// 原生桥注册失败事件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationErrorEvent {
    pub error: String,
}

/// 原生桥三个事件通道的接收端
///
/// 每条通道内部按平台触发顺序送达，通道之间没有顺序保证。
/// 每个会话只能取走一次。
pub struct NativeEventChannels {
    /// 注册成功（token 签发，可能在一个会话内多次触发）
    pub registration: mpsc::UnboundedReceiver<TokenEvent>,
    /// 注册失败
    pub registration_error: mpsc::UnboundedReceiver<RegistrationErrorEvent>,
    /// 前台收到推送
    pub notification: mpsc::UnboundedReceiver<NativePayload>,
}

/// 原生推送桥接口
///
/// 平台 SDK 的契约，按不透明服务消费；本库不拥有 SDK 本身。
#[async_trait]
pub trait NativePushBridge: Send + Sync {
    /// 弹出系统授权框，返回 granted / denied
    async fn request_permissions(&self) -> Result<PermissionStatus>;

    /// 向平台推送后端发起设备注册
    ///
    /// 不直接返回 token，结果经 registration 通道带外送达。
    async fn register(&self) -> Result<()>;

    /// 取走事件通道接收端；重复调用返回错误
    fn subscribe(&self) -> Result<NativeEventChannels>;
}
