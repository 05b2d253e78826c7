//! 请求结果记录
//!
//! [`Client`](crate::Client)每次调用后把结果交给[`RequestRecorder`]：
//!
//! - 业务错误：`code`和`message`为服务端返回的内容
//! - 网络/http错误：`code`为[`HTTP_ERROR`]，`message`为错误信息
//! - 成功：只在日志级别为`INFO`或`DEBUG`时记录，`code`和`message`为空字符串
//!
//! 默认使用[`TracingRecorder`]，需要落盘的话使用[`FileRecorder`]

use crate::Error;
use lazop_sdk_common::helper::{date_suffix, log_timestamp, now_local};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use time::OffsetDateTime;

pub const HTTP_ERROR: &str = "HTTP_ERROR";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOutcome<'a> {
    /// 带系统参数的请求地址
    pub url: &'a str,
    pub code: &'a str,
    pub message: &'a str,
}

impl RequestOutcome<'_> {
    /// 成功的记录`code`为空
    pub fn is_failure(&self) -> bool {
        !self.code.is_empty()
    }
}

pub trait RequestRecorder: Send + Sync {
    fn record(&self, outcome: &RequestOutcome<'_>);
}

/// 通过`tracing`输出，失败用`error`级别，成功用`info`级别
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingRecorder;

impl RequestRecorder for TracingRecorder {
    fn record(&self, outcome: &RequestOutcome<'_>) {
        if outcome.is_failure() {
            tracing::error!(
                url = outcome.url,
                code = outcome.code,
                message = outcome.message,
                "lazop api request failed"
            );
        } else {
            tracing::info!(url = outcome.url, "lazop api request succeeded");
        }
    }
}

/// 追加写入`<dir>/lazopsdk.log.<YYYY-MM-DD>`
///
/// 每行格式：`ERROR: <timestamp>: ^_^<url>^_^<code>^_^<message>`
///
/// 文件在创建时打开，日期后缀也在此时确定，之后不会切换文件
#[derive(Debug)]
pub struct FileRecorder {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileRecorder {
    /// 写入`$HOME/logs/`
    pub fn open_default() -> Result<Self, Error> {
        let home = std::env::var_os("HOME")
            .ok_or_else(|| Error::Common("HOME is not set".to_owned()))?;
        Self::open_in(Path::new(&home).join("logs"))
    }

    /// 目录不存在时会自动创建
    pub fn open_in(dir: impl AsRef<Path>) -> Result<Self, Error> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("lazopsdk.log.{}", date_suffix(&now_local())?));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format_line(outcome: &RequestOutcome<'_>, at: &OffsetDateTime) -> Result<String, Error> {
        Ok(format!(
            "ERROR: {}: ^_^{}^_^{}^_^{}\n",
            log_timestamp(at)?,
            outcome.url,
            outcome.code,
            outcome.message
        ))
    }
}

impl RequestRecorder for FileRecorder {
    fn record(&self, outcome: &RequestOutcome<'_>) {
        let line = match Self::format_line(outcome, &now_local()) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!("format lazop log line failed: {e}");
                return;
            }
        };
        // 写日志失败不影响api调用本身
        let Ok(mut file) = self.file.lock() else {
            tracing::warn!(path = %self.path.display(), "lazop log file lock poisoned");
            return;
        };
        if let Err(e) = file.write_all(line.as_bytes()) {
            tracing::warn!(path = %self.path.display(), "write lazop log failed: {e}");
        }
    }
}
