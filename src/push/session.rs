use std::sync::Arc;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, error, info};
use uuid::Uuid;
use crate::config::PushConfig;
use crate::error::{RegistrarError, Result};
use crate::platform::{Platform, PlatformDetector};
use crate::push::bridge::{BrowserPermissions, MessagingClient, NativePushBridge};
use crate::push::sink::PushSink;
use crate::push::strategy::{NativeStrategy, RegisterStrategy, WebStrategy};
use crate::push::types::PermissionStatus;

/// 会话状态（注册器独占，只在事件循环的回调轮次里写）
struct SessionState {
    push_token: String,
    permission_status: PermissionStatus,
    token_updated_at: Option<DateTime<Utc>>,
}

impl SessionState {
    fn new() -> Self {
        Self {
            push_token: String::new(),
            permission_status: PermissionStatus::Default,
            token_updated_at: None,
        }
    }
}

/// Token 变更通知器（两种策略共用）
///
/// 平台可能在一个会话内多次签发 token，以最新值为准；
/// 值实际变化时才回调应用的 update_token，每次变化恰好一次。
pub struct TokenNotifier {
    state: Arc<RwLock<SessionState>>,
    sink: Arc<dyn PushSink>,
}

impl TokenNotifier {
    fn new(state: Arc<RwLock<SessionState>>, sink: Arc<dyn PushSink>) -> Self {
        Self { state, sink }
    }

    /// 写入最新 token
    pub fn store(&self, token: String) {
        let changed = {
            let mut state = self.state.write();
            if state.push_token == token {
                false
            } else {
                state.push_token = token.clone();
                state.token_updated_at = Some(Utc::now());
                true
            }
        };
        if changed {
            debug!("[REGISTRAR] Push token changed");
            self.sink.update_token(&token);
        }
    }
}

/// 推送注册器（会话编排）
///
/// 一个会话一个实例：持有当前 token 与权限状态，
/// 初始化入口按平台探测结果走原生或 Web 注册路径。
pub struct PushRegistrar {
    state: Arc<RwLock<SessionState>>,
    notifier: Arc<TokenNotifier>,
    strategy: Arc<dyn RegisterStrategy>,
    // 并发初始化串行化：同一会话一次只跑一个尝试
    init_lock: tokio::sync::Mutex<()>,
}

impl PushRegistrar {
    pub fn builder() -> PushRegistrarBuilder {
        PushRegistrarBuilder::new()
    }

    /// 初始化推送会话
    ///
    /// app_user_id 为空时是无操作：不弹授权框，不改任何状态。
    /// 权限被拒绝是良性结果（返回 Ok，状态记为 denied）；
    /// 能力缺失、契约违反和注册失败以错误返回，注册失败可重试。
    pub async fn initialize(&self, app_user_id: &str) -> Result<()> {
        if app_user_id.is_empty() {
            debug!("[REGISTRAR] Empty app user id, initialization skipped");
            return Ok(());
        }

        let _guard = self.init_lock.lock().await;

        let attempt_id = Uuid::new_v4();
        info!(
            "[REGISTRAR] Initializing push session: attempt_id={}, platform={}",
            attempt_id,
            self.strategy.platform().as_str()
        );

        let status = self.strategy.request_permission().await.map_err(|e| {
            error!(
                "[REGISTRAR] Permission request failed: attempt_id={}, error={}",
                attempt_id, e
            );
            e
        })?;
        self.advance_permission(status);

        if !status.is_granted() {
            info!(
                "[REGISTRAR] Permission not granted ({}), registration skipped: attempt_id={}",
                status.as_str(),
                attempt_id
            );
            return Ok(());
        }

        match self.strategy.acquire_token().await {
            Ok(Some(token)) => {
                info!("[REGISTRAR] Token acquired inline: attempt_id={}", attempt_id);
                self.notifier.store(token);
                Ok(())
            }
            Ok(None) => {
                // 原生路径：token 经监听通道带外送达
                Ok(())
            }
            Err(e) => {
                error!(
                    "[REGISTRAR] Initialization failed: attempt_id={}, error={}",
                    attempt_id, e
                );
                Err(e)
            }
        }
    }

    fn advance_permission(&self, next: PermissionStatus) {
        let mut state = self.state.write();
        state.permission_status = state.permission_status.advance(next);
    }

    /// 当前 delivery token（空串表示尚未获得）
    pub fn push_token(&self) -> String {
        self.state.read().push_token.clone()
    }

    /// 当前权限状态
    pub fn permission_status(&self) -> PermissionStatus {
        self.state.read().permission_status
    }

    /// token 最近一次变化的时间
    pub fn token_updated_at(&self) -> Option<DateTime<Utc>> {
        self.state.read().token_updated_at
    }

    /// 会话所在平台
    pub fn platform(&self) -> Platform {
        self.strategy.platform()
    }

    /// 卸载监听任务
    pub fn shutdown(&self) {
        info!("[REGISTRAR] Session shutdown, detaching listeners");
        self.strategy.detach_listeners();
    }
}

impl Drop for PushRegistrar {
    fn drop(&mut self) {
        self.strategy.detach_listeners();
    }
}

/// 注册器构建器
///
/// 收集平台探测器、平台桥、应用 Sink 与配置，
/// build 时按探测到的平台校验组合并选定策略。
pub struct PushRegistrarBuilder {
    detector: Option<Arc<dyn PlatformDetector>>,
    native_bridge: Option<Arc<dyn NativePushBridge>>,
    browser: Option<Arc<dyn BrowserPermissions>>,
    messaging: Option<Arc<dyn MessagingClient>>,
    sink: Option<Arc<dyn PushSink>>,
    config: PushConfig,
}

impl PushRegistrarBuilder {
    pub fn new() -> Self {
        Self {
            detector: None,
            native_bridge: None,
            browser: None,
            messaging: None,
            sink: None,
            config: PushConfig::default(),
        }
    }

    pub fn with_detector(mut self, detector: Arc<dyn PlatformDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    pub fn with_native_bridge(mut self, bridge: Arc<dyn NativePushBridge>) -> Self {
        self.native_bridge = Some(bridge);
        self
    }

    pub fn with_browser(mut self, browser: Arc<dyn BrowserPermissions>) -> Self {
        self.browser = Some(browser);
        self
    }

    pub fn with_messaging(mut self, messaging: Arc<dyn MessagingClient>) -> Self {
        self.messaging = Some(messaging);
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn PushSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_config(mut self, config: PushConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<PushRegistrar> {
        let detector = self.detector.ok_or_else(|| {
            RegistrarError::Configuration("platform detector is required".to_string())
        })?;
        let sink = self.sink.ok_or_else(|| {
            RegistrarError::Configuration("push sink is required".to_string())
        })?;

        let state = Arc::new(RwLock::new(SessionState::new()));
        let notifier = Arc::new(TokenNotifier::new(Arc::clone(&state), Arc::clone(&sink)));

        // 策略在会话启动时选定一次，之后不再切换
        let strategy: Arc<dyn RegisterStrategy> = match detector.platform() {
            Platform::Native => {
                let bridge = self.native_bridge.ok_or_else(|| {
                    RegistrarError::Configuration(
                        "native platform requires a push bridge".to_string(),
                    )
                })?;
                Arc::new(NativeStrategy::new(bridge, Arc::clone(&notifier), sink))
            }
            Platform::Web => {
                let browser = self.browser.ok_or_else(|| {
                    RegistrarError::Configuration(
                        "web platform requires browser permissions".to_string(),
                    )
                })?;
                let messaging = self.messaging.ok_or_else(|| {
                    RegistrarError::Configuration(
                        "web platform requires a messaging client".to_string(),
                    )
                })?;
                Arc::new(WebStrategy::new(browser, messaging, sink, &self.config))
            }
        };

        Ok(PushRegistrar {
            state,
            notifier,
            strategy,
            init_lock: tokio::sync::Mutex::new(()),
        })
    }
}

impl Default for PushRegistrarBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::push::sink::ChannelSink;

    #[test]
    fn test_token_notifier_change_only() {
        let (sink, _notifications, mut tokens) = ChannelSink::new();
        let state = Arc::new(RwLock::new(SessionState::new()));
        let notifier = TokenNotifier::new(Arc::clone(&state), Arc::new(sink));

        notifier.store("a".to_string());
        notifier.store("a".to_string()); // 重复值不重复回调
        notifier.store("b".to_string());

        assert_eq!(tokens.try_recv().unwrap(), "a");
        assert_eq!(tokens.try_recv().unwrap(), "b");
        assert!(tokens.try_recv().is_err());
        assert_eq!(state.read().push_token, "b");
        assert!(state.read().token_updated_at.is_some());
    }

    #[test]
    fn test_builder_missing_pieces() {
        use crate::platform::FixedPlatform;

        let result = PushRegistrar::builder().build();
        assert!(matches!(result, Err(RegistrarError::Configuration(_))));

        // 原生平台缺桥
        let (sink, _n, _t) = ChannelSink::new();
        let result = PushRegistrar::builder()
            .with_detector(Arc::new(FixedPlatform(Platform::Native)))
            .with_sink(Arc::new(sink))
            .build();
        assert!(matches!(result, Err(RegistrarError::Configuration(_))));
    }
}
