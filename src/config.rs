use std::env;
use std::fs;
use std::path::Path;
use serde::{Deserialize, Serialize};
use anyhow::{Context, Result};
use tracing::info;

/// 推送配置
///
/// 进程启动时组装一次，之后只读传递，不做全局可变状态。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PushConfig {
    /// Web 推送的 VAPID 项目密钥（Web 平台必填，缺失视为调用方契约违反）
    pub vapid_key: Option<String>,
    /// Web 端权限被拒绝后是否允许再次弹出授权框
    ///
    /// 浏览器会永久记住拒绝决定，是否重新尝试交给调用方策略。
    pub web_reprompt_denied: bool,
    /// 日志级别
    pub log_level: String,
    /// 日志格式（json / pretty / compact）
    pub log_format: Option<String>,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            vapid_key: None,
            web_reprompt_denied: true,
            log_level: "info".to_string(),
            log_format: None,
        }
    }
}

impl PushConfig {
    /// 从 TOML 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("无法读取配置文件: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("无法解析配置文件: {}", path.display()))?;
        info!("[CONFIG] Loaded push config from {}", path.display());
        Ok(config)
    }

    /// 加载配置：文件（可选） + 环境变量覆盖
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        // .env 仅用于本地开发，缺失时忽略
        dotenvy::dotenv().ok();

        let mut config = match path {
            Some(p) if p.as_ref().exists() => Self::from_file(p)?,
            _ => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// 环境变量覆盖（优先级高于文件）
    fn apply_env_overrides(&mut self) {
        if let Ok(key) = env::var("PUSH_VAPID_KEY") {
            self.vapid_key = Some(key);
        }
        if let Ok(v) = env::var("PUSH_WEB_REPROMPT_DENIED") {
            self.web_reprompt_denied = v == "1" || v.eq_ignore_ascii_case("true");
        }
        if let Ok(level) = env::var("PUSH_LOG_LEVEL") {
            self.log_level = level;
        }
    }

    pub fn with_vapid_key(mut self, key: impl Into<String>) -> Self {
        self.vapid_key = Some(key.into());
        self
    }

    pub fn with_web_reprompt_denied(mut self, reprompt: bool) -> Self {
        self.web_reprompt_denied = reprompt;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PushConfig::default();
        assert!(config.vapid_key.is_none());
        assert!(config.web_reprompt_denied);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_builder_style() {
        let config = PushConfig::default()
            .with_vapid_key("vapid-abc")
            .with_web_reprompt_denied(false);
        assert_eq!(config.vapid_key.as_deref(), Some("vapid-abc"));
        assert!(!config.web_reprompt_denied);
    }

    #[test]
    fn test_from_toml() {
        let config: PushConfig = toml::from_str(
            r#"
            vapid_key = "vapid-xyz"
            web_reprompt_denied = false
            log_level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.vapid_key.as_deref(), Some("vapid-xyz"));
        assert!(!config.web_reprompt_denied);
        assert_eq!(config.log_level, "debug");
    }
}
