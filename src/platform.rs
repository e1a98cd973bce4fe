use serde::{Deserialize, Serialize};

/// 运行平台（只区分这两类）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// 原生应用壳（iOS / Android）
    Native,
    /// 通用 Web 引擎
    Web,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Native => "native",
            Platform::Web => "web",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "native" => Some(Platform::Native),
            "web" => Some(Platform::Web),
            _ => None,
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Platform::Native)
    }
}

/// 平台探测能力
///
/// 单一谓词：当前是否运行在原生应用壳内。纯同步、无副作用，
/// 会话启动时调用一次，之后策略不再切换。
pub trait PlatformDetector: Send + Sync {
    /// 是否运行在原生应用壳内
    fn is_native_platform(&self) -> bool;

    /// 探测结果对应的平台
    fn platform(&self) -> Platform {
        if self.is_native_platform() {
            Platform::Native
        } else {
            Platform::Web
        }
    }
}

/// 固定平台探测器（进程启动时注入探测结果）
#[derive(Debug, Clone, Copy)]
pub struct FixedPlatform(pub Platform);

impl PlatformDetector for FixedPlatform {
    fn is_native_platform(&self) -> bool {
        self.0.is_native()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_str_roundtrip() {
        assert_eq!(Platform::Native.as_str(), "native");
        assert_eq!(Platform::Web.as_str(), "web");
        assert_eq!(Platform::from_str("Native"), Some(Platform::Native));
        assert_eq!(Platform::from_str("web"), Some(Platform::Web));
        assert_eq!(Platform::from_str("desktop"), None);
    }

    #[test]
    fn test_fixed_detector() {
        assert!(FixedPlatform(Platform::Native).is_native_platform());
        assert!(!FixedPlatform(Platform::Web).is_native_platform());
        assert_eq!(FixedPlatform(Platform::Web).platform(), Platform::Web);
    }
}
