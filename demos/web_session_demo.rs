use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tracing::info;

use pushgate::logging::init_logging;
use pushgate::push::bridge::{MockBrowser, MockMessagingClient};
use pushgate::push::LogSink;
use pushgate::{
    FixedPlatform, PermissionStatus, Platform, PushConfig, PushRegistrar, WebNotification,
    WebPayload,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 配置：文件缺省 + 环境变量覆盖，再补上演示用的 VAPID 密钥
    let config = PushConfig::load(None::<&str>)?.with_vapid_key("demo-vapid-key");
    init_logging(&config.log_level, config.log_format.as_deref(), false)?;

    info!("🚀 Web 推送会话演示");

    let browser = Arc::new(MockBrowser::new(PermissionStatus::Granted));
    let messaging = Arc::new(MockMessagingClient::with_token("demo-web-token"));

    let registrar = PushRegistrar::builder()
        .with_detector(Arc::new(FixedPlatform(Platform::Web)))
        .with_browser(browser)
        .with_messaging(messaging.clone())
        .with_sink(Arc::new(LogSink))
        .with_config(config)
        .build()?;

    // 初始化：浏览器授权 + token 获取 + 前台监听
    registrar.initialize("demo-user-2").await?;
    info!(
        "初始化完成: permission={}, token={}",
        registrar.permission_status().as_str(),
        registrar.push_token()
    );

    // 前台收到一条 Web 消息
    messaging.emit_message(WebPayload {
        message_id: Some("msg-001".to_string()),
        notification: Some(WebNotification {
            title: Some("演示通知".to_string()),
            body: Some("来自云消息客户端的前台消息".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    });

    sleep(Duration::from_millis(100)).await;

    registrar.shutdown();
    info!("✅ 演示完成");
    Ok(())
}
