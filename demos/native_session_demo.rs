use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tracing::info;

use pushgate::logging::init_logging;
use pushgate::push::bridge::MockNativeBridge;
use pushgate::push::LogSink;
use pushgate::{
    FixedPlatform, NativePayload, PermissionStatus, Platform, PushRegistrar,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging("debug", None, false)?;

    info!("🚀 原生推送会话演示");

    // Mock 桥代替真实平台 SDK，事件手动驱动
    let bridge = Arc::new(MockNativeBridge::new(PermissionStatus::Granted));

    let registrar = PushRegistrar::builder()
        .with_detector(Arc::new(FixedPlatform(Platform::Native)))
        .with_native_bridge(bridge.clone())
        .with_sink(Arc::new(LogSink))
        .build()?;

    // 初始化：授权 + 设备注册 + 挂监听
    registrar.initialize("demo-user-1").await?;
    info!(
        "初始化完成: platform={}, permission={}",
        registrar.platform().as_str(),
        registrar.permission_status().as_str()
    );

    // 平台稍后签发 token
    bridge.emit_registration("demo-token-001");
    // 平台重新签发，以最新值为准
    bridge.emit_registration("demo-token-002");

    // 前台收到一条推送
    bridge.emit_notification(NativePayload {
        title: Some("新消息".to_string()),
        body: Some("你收到一条演示推送".to_string()),
        ..Default::default()
    });

    sleep(Duration::from_millis(100)).await;
    info!("📦 当前 token = {}", registrar.push_token());

    registrar.shutdown();
    info!("✅ 演示完成");
    Ok(())
}
