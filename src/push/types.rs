use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use crate::platform::Platform;

/// 通知权限状态（显式状态机）
///
/// 只允许从 Default 向前走到 Granted / Denied，
/// 任何转移都不会退回 Default。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    /// 已授权
    Granted,
    /// 已拒绝（本次尝试的良性终态，是否再次弹框取决于平台策略）
    Denied,
    /// 尚未询问
    Default,
}

impl PermissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionStatus::Granted => "granted",
            PermissionStatus::Denied => "denied",
            PermissionStatus::Default => "default",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "granted" => Some(PermissionStatus::Granted),
            "denied" => Some(PermissionStatus::Denied),
            "default" => Some(PermissionStatus::Default),
            _ => None,
        }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }

    /// 是否已有用户决定（granted 或 denied）
    pub fn is_decided(&self) -> bool {
        !matches!(self, PermissionStatus::Default)
    }

    /// 状态前进：Default 不能覆盖已有的决定
    pub fn advance(self, next: PermissionStatus) -> PermissionStatus {
        if next == PermissionStatus::Default {
            self
        } else {
            next
        }
    }
}

/// 原生推送载荷（平台桥 pushNotificationReceived 事件的字段集）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NativePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<u32>,
    /// 自由格式业务数据
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub click_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

/// Web 前台消息的 notification 区块
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebNotification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Web 前台消息载荷（云消息客户端 onMessage 的字段集）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapse_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification: Option<WebNotification>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub data: HashMap<String, String>,
}

/// 归一化通知
///
/// 两种线上载荷形态统一成一个带判别标签的形状，
/// 下游回调只需看 type 标签即可知道哪组字段有效。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NormalizedNotification {
    Native(NativePayload),
    Web(WebPayload),
}

impl NormalizedNotification {
    /// 载荷来源平台
    pub fn platform(&self) -> Platform {
        match self {
            NormalizedNotification::Native(_) => Platform::Native,
            NormalizedNotification::Web(_) => Platform::Web,
        }
    }

    /// 取标题（两种形态的便捷访问）
    pub fn title(&self) -> Option<&str> {
        match self {
            NormalizedNotification::Native(payload) => payload.title.as_deref(),
            NormalizedNotification::Web(payload) => payload
                .notification
                .as_ref()
                .and_then(|n| n.title.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_advance_forward_only() {
        let status = PermissionStatus::Default;
        let status = status.advance(PermissionStatus::Granted);
        assert_eq!(status, PermissionStatus::Granted);
        // 已有决定不会被 Default 覆盖
        assert_eq!(
            status.advance(PermissionStatus::Default),
            PermissionStatus::Granted
        );
        assert_eq!(
            PermissionStatus::Denied.advance(PermissionStatus::Default),
            PermissionStatus::Denied
        );
        // 重新授权允许改变决定
        assert_eq!(
            PermissionStatus::Denied.advance(PermissionStatus::Granted),
            PermissionStatus::Granted
        );
    }

    #[test]
    fn test_permission_str() {
        assert_eq!(PermissionStatus::Granted.as_str(), "granted");
        assert_eq!(
            PermissionStatus::from_str("DENIED"),
            Some(PermissionStatus::Denied)
        );
        assert_eq!(PermissionStatus::from_str("maybe"), None);
        assert!(PermissionStatus::Denied.is_decided());
        assert!(!PermissionStatus::Default.is_decided());
    }

    #[test]
    fn test_native_tag_shape() {
        let payload = NativePayload {
            title: Some("X".to_string()),
            ..Default::default()
        };
        let json =
            serde_json::to_value(NormalizedNotification::Native(payload)).unwrap();
        assert_eq!(json["type"], "native");
        assert_eq!(json["title"], "X");
        // 标签互斥：native 形态不会携带 web 字段
        assert!(json.get("notification").is_none());
    }

    #[test]
    fn test_web_tag_shape() {
        let payload = WebPayload {
            notification: Some(WebNotification {
                title: Some("Y".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let notification = NormalizedNotification::Web(payload);
        assert_eq!(notification.title(), Some("Y"));
        let json = serde_json::to_value(notification).unwrap();
        assert_eq!(json["type"], "web");
        assert_eq!(json["notification"]["title"], "Y");
    }
}
