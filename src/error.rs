use std::fmt;
use std::error::Error as StdError;
use serde::{Serialize, Deserialize};

/// 推送会话错误类型
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RegistrarError {
    /// 运行环境缺少通知能力（本会话内不可恢复）
    CapabilityMissing(String),
    /// 调用方违反契约（缺少必填参数，未发起任何 SDK 调用）
    InvalidInvocation(String),
    /// 平台注册 / token 获取失败（会话保持可用，可重试）
    RegistrationFailure(String),
    /// 平台桥 / SDK 调用失败
    Bridge(String),
    /// 配置错误
    Configuration(String),
    /// 内部错误
    Internal(String),
}

impl fmt::Display for RegistrarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrarError::CapabilityMissing(msg) => write!(f, "Capability missing: {}", msg),
            RegistrarError::InvalidInvocation(msg) => write!(f, "Invalid invocation: {}", msg),
            RegistrarError::RegistrationFailure(msg) => write!(f, "Registration failure: {}", msg),
            RegistrarError::Bridge(msg) => write!(f, "Bridge error: {}", msg),
            RegistrarError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            RegistrarError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl StdError for RegistrarError {}

impl RegistrarError {
    /// 同一会话内是否允许重试初始化
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RegistrarError::RegistrationFailure(_)
                | RegistrarError::Bridge(_)
                | RegistrarError::Internal(_)
        )
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, RegistrarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            RegistrarError::CapabilityMissing("no Notification API".to_string()).to_string(),
            "Capability missing: no Notification API"
        );
        assert_eq!(
            RegistrarError::RegistrationFailure("token fetch failed".to_string()).to_string(),
            "Registration failure: token fetch failed"
        );
    }

    #[test]
    fn test_error_retryable() {
        assert!(RegistrarError::RegistrationFailure("x".to_string()).is_retryable());
        assert!(RegistrarError::Bridge("x".to_string()).is_retryable());
        assert!(!RegistrarError::CapabilityMissing("x".to_string()).is_retryable());
        assert!(!RegistrarError::InvalidInvocation("x".to_string()).is_retryable());
        assert!(!RegistrarError::Configuration("x".to_string()).is_retryable());
    }
}
