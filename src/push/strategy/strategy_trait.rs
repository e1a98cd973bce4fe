use async_trait::async_trait;
use crate::error::Result;
use crate::platform::Platform;
use crate::push::types::PermissionStatus;

/// 注册策略接口
///
/// 原生 / Web 两个实现，会话启动时按平台探测结果二选一。
#[async_trait]
pub trait RegisterStrategy: Send + Sync {
    /// 策略对应的平台
    fn platform(&self) -> Platform;

    /// 发起权限请求，返回 granted / denied
    async fn request_permission(&self) -> Result<PermissionStatus>;

    /// 获取 delivery token（只在权限 granted 后调用）
    ///
    /// Ok(None) 表示 token 将经监听通道带外送达。
    async fn acquire_token(&self) -> Result<Option<String>>;

    /// 挂接事件监听
    ///
    /// 幂等：重复调用不会产生重复监听。
    fn attach_listeners(&self) -> Result<()>;

    /// 卸载监听任务（会话销毁时调用）
    fn detach_listeners(&self);
}
