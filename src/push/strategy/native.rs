use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use crate::error::{RegistrarError, Result};
use crate::platform::Platform;
use crate::push::bridge::NativePushBridge;
use crate::push::session::TokenNotifier;
use crate::push::sink::PushSink;
use crate::push::strategy::strategy_trait::RegisterStrategy;
use crate::push::types::{NormalizedNotification, PermissionStatus};

/// 原生注册策略
///
/// 职责：
/// - 经原生桥弹出系统授权框
/// - 挂接三条事件通道（token 签发 / 注册失败 / 前台推送）
/// - 发起设备注册，token 经 registration 通道带外送达
pub struct NativeStrategy {
    bridge: Arc<dyn NativePushBridge>,
    notifier: Arc<TokenNotifier>,
    sink: Arc<dyn PushSink>,
    attached: AtomicBool,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl NativeStrategy {
    pub fn new(
        bridge: Arc<dyn NativePushBridge>,
        notifier: Arc<TokenNotifier>,
        sink: Arc<dyn PushSink>,
    ) -> Self {
        Self {
            bridge,
            notifier,
            sink,
            attached: AtomicBool::new(false),
            tasks: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl RegisterStrategy for NativeStrategy {
    fn platform(&self) -> Platform {
        Platform::Native
    }

    async fn request_permission(&self) -> Result<PermissionStatus> {
        let status = self.bridge.request_permissions().await?;
        info!("[NATIVE PUSH] Permission result: {}", status.as_str());
        Ok(status)
    }

    async fn acquire_token(&self) -> Result<Option<String>> {
        // 注册前必须先挂好监听，否则 token 事件可能丢失
        self.attach_listeners()?;

        self.bridge.register().await.map_err(|e| {
            error!("[NATIVE PUSH] Device registration failed: {}", e);
            RegistrarError::RegistrationFailure(format!("native register failed: {}", e))
        })?;

        info!("[NATIVE PUSH] Device registration submitted, token arrives via listener");
        Ok(None)
    }

    fn attach_listeners(&self) -> Result<()> {
        if self.attached.load(Ordering::SeqCst) {
            debug!("[NATIVE PUSH] Listeners already attached, skipping");
            return Ok(());
        }
        let channels = self.bridge.subscribe()?;
        self.attached.store(true, Ordering::SeqCst);

        let mut tasks = self.tasks.lock();

        // token 签发通道：同一会话内可能多次触发，以最新值为准
        let notifier = Arc::clone(&self.notifier);
        let mut registration = channels.registration;
        tasks.push(tokio::spawn(async move {
            while let Some(event) = registration.recv().await {
                info!("[NATIVE PUSH] Registration token issued");
                notifier.store(event.value);
            }
        }));

        // 注册失败通道：上报后会话保持可用，调用方可重试初始化
        let mut errors = channels.registration_error;
        tasks.push(tokio::spawn(async move {
            while let Some(event) = errors.recv().await {
                error!("[NATIVE PUSH] Registration error: {}", event.error);
            }
        }));

        // 前台推送通道：打上 native 标签后转发给应用
        let sink = Arc::clone(&self.sink);
        let mut notifications = channels.notification;
        tasks.push(tokio::spawn(async move {
            while let Some(payload) = notifications.recv().await {
                debug!("[NATIVE PUSH] Notification received");
                sink.set_notification(NormalizedNotification::Native(payload));
            }
        }));

        Ok(())
    }

    fn detach_listeners(&self) {
        for task in self.tasks.lock().drain(..) {
            task.abort();
        }
        // attached 保持 true：事件接收端已被取走，通道不能再次挂接
    }
}
