use async_trait::async_trait;
use tokio::sync::mpsc;
use crate::error::Result;
use crate::push::types::{PermissionStatus, WebPayload};

/// 浏览器通知权限接口
///
/// 对应浏览器的 Notification API：同步的 permission 属性
/// 加上异步的授权弹框。
#[async_trait]
pub trait BrowserPermissions: Send + Sync {
    /// 当前环境是否支持通知能力
    fn supported(&self) -> bool;

    /// 同步读取当前权限属性
    fn permission(&self) -> PermissionStatus;

    /// 弹出浏览器授权框并等待用户决定
    async fn request_permission(&self) -> Result<PermissionStatus>;
}

/// 云消息客户端接口
#[async_trait]
pub trait MessagingClient: Send + Sync {
    /// 用 VAPID 密钥换取 delivery token；Ok(None) 表示后端未签发
    async fn get_token(&self, vapid_key: &str) -> Result<Option<String>>;

    /// 安装前台消息监听，返回消息接收端；重复调用返回错误
    fn on_message(&self) -> Result<mpsc::UnboundedReceiver<WebPayload>>;
}
