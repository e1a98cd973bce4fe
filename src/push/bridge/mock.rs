use std::sync::atomic::{AtomicUsize, Ordering};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use tokio::sync::mpsc;
use tracing::info;
use crate::error::{RegistrarError, Result};
use crate::push::bridge::native::{
    NativeEventChannels, NativePushBridge, RegistrationErrorEvent, TokenEvent,
};
use crate::push::bridge::web::{BrowserPermissions, MessagingClient};
use crate::push::types::{NativePayload, PermissionStatus, WebPayload};

/// Mock 原生桥（测试和演示用）
///
/// 不接真实平台 SDK，事件由测试侧通过 emit_* 方法驱动。
pub struct MockNativeBridge {
    permission: PermissionStatus,
    register_error: Option<String>,
    permission_requests: AtomicUsize,
    registration_tx: mpsc::UnboundedSender<TokenEvent>,
    error_tx: mpsc::UnboundedSender<RegistrationErrorEvent>,
    notification_tx: mpsc::UnboundedSender<NativePayload>,
    channels: Mutex<Option<NativeEventChannels>>,
}

impl MockNativeBridge {
    pub fn new(permission: PermissionStatus) -> Self {
        let (registration_tx, registration_rx) = mpsc::unbounded_channel();
        let (error_tx, error_rx) = mpsc::unbounded_channel();
        let (notification_tx, notification_rx) = mpsc::unbounded_channel();
        Self {
            permission,
            register_error: None,
            permission_requests: AtomicUsize::new(0),
            registration_tx,
            error_tx,
            notification_tx,
            channels: Mutex::new(Some(NativeEventChannels {
                registration: registration_rx,
                registration_error: error_rx,
                notification: notification_rx,
            })),
        }
    }

    /// register 调用直接报错的变体
    pub fn failing_register(permission: PermissionStatus, error: impl Into<String>) -> Self {
        let mut bridge = Self::new(permission);
        bridge.register_error = Some(error.into());
        bridge
    }

    /// 已发起的授权请求次数
    pub fn permission_requests(&self) -> usize {
        self.permission_requests.load(Ordering::SeqCst)
    }

    /// 模拟平台签发 token
    pub fn emit_registration(&self, token: &str) {
        let _ = self.registration_tx.send(TokenEvent {
            value: token.to_string(),
        });
    }

    /// 模拟平台注册失败事件
    pub fn emit_registration_error(&self, error: &str) {
        let _ = self.error_tx.send(RegistrationErrorEvent {
            error: error.to_string(),
        });
    }

    /// 模拟前台收到一条原生推送
    pub fn emit_notification(&self, payload: NativePayload) {
        let _ = self.notification_tx.send(payload);
    }
}

#[async_trait]
impl NativePushBridge for MockNativeBridge {
    async fn request_permissions(&self) -> Result<PermissionStatus> {
        self.permission_requests.fetch_add(1, Ordering::SeqCst);
        info!(
            "[MOCK BRIDGE] Permission prompt answered: {}",
            self.permission.as_str()
        );
        Ok(self.permission)
    }

    async fn register(&self) -> Result<()> {
        match &self.register_error {
            Some(msg) => Err(RegistrarError::Bridge(msg.clone())),
            None => {
                info!("[MOCK BRIDGE] Device registration accepted");
                Ok(())
            }
        }
    }

    fn subscribe(&self) -> Result<NativeEventChannels> {
        self.channels.lock().take().ok_or_else(|| {
            RegistrarError::Internal("native event channels already taken".to_string())
        })
    }
}

/// Mock 浏览器权限（测试和演示用）
pub struct MockBrowser {
    supported: bool,
    current: RwLock<PermissionStatus>,
    prompt_answer: PermissionStatus,
    prompts: AtomicUsize,
}

impl MockBrowser {
    /// 支持通知的浏览器，初始权限 default，弹框后返回给定应答
    pub fn new(prompt_answer: PermissionStatus) -> Self {
        Self {
            supported: true,
            current: RwLock::new(PermissionStatus::Default),
            prompt_answer,
            prompts: AtomicUsize::new(0),
        }
    }

    /// 完全不支持通知的浏览器
    pub fn unsupported() -> Self {
        let mut browser = Self::new(PermissionStatus::Default);
        browser.supported = false;
        browser
    }

    /// 预置已记住的权限决定（浏览器会跨会话记住）
    pub fn with_current(self, current: PermissionStatus) -> Self {
        *self.current.write() = current;
        self
    }

    /// 已弹出授权框的次数
    pub fn prompt_count(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BrowserPermissions for MockBrowser {
    fn supported(&self) -> bool {
        self.supported
    }

    fn permission(&self) -> PermissionStatus {
        *self.current.read()
    }

    async fn request_permission(&self) -> Result<PermissionStatus> {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        // 浏览器记住用户的决定
        *self.current.write() = self.prompt_answer;
        Ok(self.prompt_answer)
    }
}

/// Mock 云消息客户端（测试和演示用）
pub struct MockMessagingClient {
    token: Option<String>,
    fail: Option<String>,
    get_token_calls: AtomicUsize,
    last_vapid_key: Mutex<Option<String>>,
    message_tx: mpsc::UnboundedSender<WebPayload>,
    message_rx: Mutex<Option<mpsc::UnboundedReceiver<WebPayload>>>,
}

impl MockMessagingClient {
    fn build(token: Option<String>, fail: Option<String>) -> Self {
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        Self {
            token,
            fail,
            get_token_calls: AtomicUsize::new(0),
            last_vapid_key: Mutex::new(None),
            message_tx,
            message_rx: Mutex::new(Some(message_rx)),
        }
    }

    /// 签发给定 token 的客户端
    pub fn with_token(token: impl Into<String>) -> Self {
        Self::build(Some(token.into()), None)
    }

    /// 不签发 token 的客户端（getToken 返回 None）
    pub fn without_token() -> Self {
        Self::build(None, None)
    }

    /// getToken 直接报错的客户端
    pub fn failing(error: impl Into<String>) -> Self {
        Self::build(None, Some(error.into()))
    }

    /// 已发起的 getToken 调用次数
    pub fn get_token_calls(&self) -> usize {
        self.get_token_calls.load(Ordering::SeqCst)
    }

    /// 最近一次 getToken 收到的 VAPID 密钥
    pub fn last_vapid_key(&self) -> Option<String> {
        self.last_vapid_key.lock().clone()
    }

    /// 模拟前台收到一条 Web 消息
    pub fn emit_message(&self, payload: WebPayload) {
        let _ = self.message_tx.send(payload);
    }
}

#[async_trait]
impl MessagingClient for MockMessagingClient {
    async fn get_token(&self, vapid_key: &str) -> Result<Option<String>> {
        self.get_token_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_vapid_key.lock() = Some(vapid_key.to_string());
        match &self.fail {
            Some(msg) => Err(RegistrarError::Bridge(msg.clone())),
            None => Ok(self.token.clone()),
        }
    }

    fn on_message(&self) -> Result<mpsc::UnboundedReceiver<WebPayload>> {
        self.message_rx.lock().take().ok_or_else(|| {
            RegistrarError::Internal("foreground message listener already installed".to_string())
        })
    }
}
