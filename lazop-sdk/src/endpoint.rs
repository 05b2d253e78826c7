//! 各站点的API网关地址

use crate::Error;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::str::FromStr;

/// 调用API时使用的网关地址
///
/// 配置文件中可以写国家代码（`sg`、`my`、`vn`、`th`、`ph`、`id`）、`auth`，
/// 或者直接写完整的`http(s)://`地址
#[derive(Debug, Clone, PartialEq, Eq, DeserializeFromStr, SerializeDisplay)]
pub enum Endpoint {
    Singapore,
    Malaysia,
    Vietnam,
    Thailand,
    Philippines,
    Indonesia,
    /// 授权相关的api，如`/auth/token/create`
    Authorization,
    Custom(String),
}

impl Endpoint {
    pub fn url(&self) -> &str {
        match self {
            Endpoint::Singapore => "https://api.lazada.sg/rest",
            Endpoint::Malaysia => "https://api.lazada.com.my/rest",
            Endpoint::Vietnam => "https://api.lazada.vn/rest",
            Endpoint::Thailand => "https://api.lazada.co.th/rest",
            Endpoint::Philippines => "https://api.lazada.com.ph/rest",
            Endpoint::Indonesia => "https://api.lazada.co.id/rest",
            Endpoint::Authorization => "https://auth.lazada.com/rest",
            Endpoint::Custom(url) => url.as_str(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url())
    }
}

impl FromStr for Endpoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let endpoint = match s.to_ascii_lowercase().as_str() {
            "sg" => Endpoint::Singapore,
            "my" => Endpoint::Malaysia,
            "vn" => Endpoint::Vietnam,
            "th" => Endpoint::Thailand,
            "ph" => Endpoint::Philippines,
            "id" => Endpoint::Indonesia,
            "auth" => Endpoint::Authorization,
            lower if lower.starts_with("https://") || lower.starts_with("http://") => {
                KNOWN
                    .iter()
                    .find(|e| e.url() == s)
                    .cloned()
                    .unwrap_or_else(|| Endpoint::Custom(s.to_owned()))
            }
            _ => return Err(Error::Common(format!("unknown endpoint: {s}"))),
        };
        Ok(endpoint)
    }
}

const KNOWN: [Endpoint; 7] = [
    Endpoint::Singapore,
    Endpoint::Malaysia,
    Endpoint::Vietnam,
    Endpoint::Thailand,
    Endpoint::Philippines,
    Endpoint::Indonesia,
    Endpoint::Authorization,
];
