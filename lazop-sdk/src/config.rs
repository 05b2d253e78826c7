use crate::{Endpoint, Error};
use serde::Deserialize;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::str::FromStr;

/// 日志级别
///
/// - `Error`: 只记录失败的请求（默认）
/// - `Info`: 成功的请求也会记录
/// - `Debug`: 同`Info`，并且请求会带上系统参数`debug=true`
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, DeserializeFromStr, SerializeDisplay,
)]
pub enum LogLevel {
    #[default]
    Error,
    Info,
    Debug,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Error => "ERROR",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ERROR" => Ok(LogLevel::Error),
            "INFO" => Ok(LogLevel::Info),
            "DEBUG" => Ok(LogLevel::Debug),
            _ => Err(Error::Common(format!("unknown log level: {s}"))),
        }
    }
}

/// 从配置文件构建[`Client`](crate::Client)
///
/// ```toml
/// server_url = "sg"
/// app_key = "123456"
/// app_secret = "..."
/// log_level = "info"
/// ```
#[derive(Deserialize, Clone)]
pub struct ClientConfig {
    pub server_url: Endpoint,
    pub app_key: String,
    pub app_secret: String,
    #[serde(default)]
    pub log_level: LogLevel,
}
