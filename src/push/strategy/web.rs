use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use crate::config::PushConfig;
use crate::error::{RegistrarError, Result};
use crate::platform::Platform;
use crate::push::bridge::{BrowserPermissions, MessagingClient};
use crate::push::sink::PushSink;
use crate::push::strategy::strategy_trait::RegisterStrategy;
use crate::push::types::{NormalizedNotification, PermissionStatus};

/// Web 注册策略
///
/// 职责：
/// - 检查浏览器通知能力，必要时弹出授权框
/// - 用 VAPID 密钥向云消息客户端换取 token
/// - token 到手后安装前台消息监听（打 web 标签转发）
pub struct WebStrategy {
    browser: Arc<dyn BrowserPermissions>,
    messaging: Arc<dyn MessagingClient>,
    sink: Arc<dyn PushSink>,
    vapid_key: Option<String>,
    reprompt_denied: bool,
    attached: AtomicBool,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl WebStrategy {
    pub fn new(
        browser: Arc<dyn BrowserPermissions>,
        messaging: Arc<dyn MessagingClient>,
        sink: Arc<dyn PushSink>,
        config: &PushConfig,
    ) -> Self {
        Self {
            browser,
            messaging,
            sink,
            vapid_key: config.vapid_key.clone(),
            reprompt_denied: config.web_reprompt_denied,
            attached: AtomicBool::new(false),
            tasks: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl RegisterStrategy for WebStrategy {
    fn platform(&self) -> Platform {
        Platform::Web
    }

    async fn request_permission(&self) -> Result<PermissionStatus> {
        // 缺失通知能力是结构性前置条件失败，不是用户拒绝
        if !self.browser.supported() {
            return Err(RegistrarError::CapabilityMissing(
                "browser has no notification support".to_string(),
            ));
        }

        let current = self.browser.permission();
        if current.is_granted() {
            debug!("[WEB PUSH] Permission already granted, no prompt needed");
            return Ok(current);
        }

        // 浏览器永久记住拒绝决定；是否再次弹框由调用方配置决定
        if current == PermissionStatus::Denied && !self.reprompt_denied {
            info!("[WEB PUSH] Permission previously denied, re-prompt disabled");
            return Ok(PermissionStatus::Denied);
        }

        let decided = self.browser.request_permission().await?;
        info!("[WEB PUSH] Permission prompt resolved: {}", decided.as_str());
        Ok(decided)
    }

    async fn acquire_token(&self) -> Result<Option<String>> {
        // VAPID 密钥是 Web 投递的必填配置，缺失时不发起任何 SDK 调用
        let vapid_key = self.vapid_key.as_deref().ok_or_else(|| {
            RegistrarError::InvalidInvocation(
                "web delivery requires a VAPID project key".to_string(),
            )
        })?;

        match self.messaging.get_token(vapid_key).await {
            Ok(Some(token)) => {
                info!("[WEB PUSH] Token fetched");
                // token 到手后才安装前台监听
                self.attach_listeners()?;
                Ok(Some(token))
            }
            Ok(None) => {
                error!("[WEB PUSH] No registration token issued, check service worker setup");
                Err(RegistrarError::RegistrationFailure(
                    "messaging client issued no token".to_string(),
                ))
            }
            Err(e) => {
                error!("[WEB PUSH] Token fetch failed: {}", e);
                Err(RegistrarError::RegistrationFailure(format!(
                    "token fetch failed: {}",
                    e
                )))
            }
        }
    }

    fn attach_listeners(&self) -> Result<()> {
        if self.attached.load(Ordering::SeqCst) {
            debug!("[WEB PUSH] Foreground listener already installed, skipping");
            return Ok(());
        }
        let mut messages = self.messaging.on_message()?;
        self.attached.store(true, Ordering::SeqCst);

        // 前台消息通道：打上 web 标签后转发给应用
        let sink = Arc::clone(&self.sink);
        self.tasks.lock().push(tokio::spawn(async move {
            while let Some(payload) = messages.recv().await {
                debug!("[WEB PUSH] Foreground message received");
                sink.set_notification(NormalizedNotification::Web(payload));
            }
        }));

        Ok(())
    }

    fn detach_listeners(&self) {
        for task in self.tasks.lock().drain(..) {
            task.abort();
        }
    }
}
