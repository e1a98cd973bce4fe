use tokio::sync::mpsc;
use tracing::info;
use crate::push::types::NormalizedNotification;

/// 应用侧回调面（由宿主应用实现）
///
/// 回调运行在共享事件循环的回调轮次里，必须保持非阻塞；
/// 耗时工作由实现方自行转交出去。
pub trait PushSink: Send + Sync {
    /// 收到一条归一化通知
    fn set_notification(&self, notification: NormalizedNotification);

    /// 推送 token 发生变化（可选实现）
    fn update_token(&self, _token: &str) {}
}

/// 日志 Sink（演示和降级用，只打印日志）
pub struct LogSink;

impl PushSink for LogSink {
    fn set_notification(&self, notification: NormalizedNotification) {
        info!(
            "[SINK] Notification received: platform={}, title={:?}",
            notification.platform().as_str(),
            notification.title()
        );
    }

    fn update_token(&self, token: &str) {
        info!("[SINK] Token updated: {}", token);
    }
}

/// 通道 Sink（测试用）
///
/// 把回调转成两条 mpsc 通道，测试侧可以逐条断言到达顺序。
pub struct ChannelSink {
    notifications: mpsc::UnboundedSender<NormalizedNotification>,
    tokens: mpsc::UnboundedSender<String>,
}

impl ChannelSink {
    pub fn new() -> (
        Self,
        mpsc::UnboundedReceiver<NormalizedNotification>,
        mpsc::UnboundedReceiver<String>,
    ) {
        let (notification_tx, notification_rx) = mpsc::unbounded_channel();
        let (token_tx, token_rx) = mpsc::unbounded_channel();
        (
            Self {
                notifications: notification_tx,
                tokens: token_tx,
            },
            notification_rx,
            token_rx,
        )
    }
}

impl PushSink for ChannelSink {
    fn set_notification(&self, notification: NormalizedNotification) {
        // 接收端已关闭时丢弃即可
        let _ = self.notifications.send(notification);
    }

    fn update_token(&self, token: &str) {
        let _ = self.tokens.send(token.to_string());
    }
}
