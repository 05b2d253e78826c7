use crate::Error;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::BTreeMap;
use time::OffsetDateTime;
use time::macros::format_description;

/// 当前时间的毫秒时间戳，用作系统参数`timestamp`
pub fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

/// 本地时间，获取不到本地时区时退回UTC
pub fn now_local() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// 输出格式: YYYY-MM-DD hh:mm:ss +hhmm
///
/// eg: 2025-11-13 21:32:03 +0800
pub fn log_timestamp(date_time: &OffsetDateTime) -> Result<String, Error> {
    let format = format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second] [offset_hour sign:mandatory][offset_minute]"
    );
    date_time
        .format(format)
        .map_err(|e| Error::Common(format!("format log timestamp failed: {e}")))
}

/// 输出格式: YYYY-MM-DD，用作日志文件名的后缀
pub fn date_suffix(date_time: &OffsetDateTime) -> Result<String, Error> {
    let format = format_description!("[year]-[month]-[day]");
    date_time
        .format(format)
        .map_err(|e| Error::Common(format!("format date failed: {e}")))
}

pub fn into_header_map(map: &BTreeMap<String, String>) -> Result<HeaderMap, Error> {
    map.iter()
        .map(|(k, v)| {
            let name = HeaderName::from_bytes(k.as_bytes())
                .map_err(|e| Error::Common(format!("invalid header name `{k}`: {e}")))?;
            let value = HeaderValue::from_str(v)
                .map_err(|e| Error::Common(format!("invalid header value for `{k}`: {e}")))?;
            Ok((name, value))
        })
        .collect()
}

pub async fn into_request_failed_error(resp: reqwest::Response) -> Error {
    let status = resp.status();
    let body = resp.text().await;
    match body {
        Ok(message) => Error::RequestAPIFailed {
            status: status.to_string(),
            message,
        },
        Err(e) => Error::Reqwest(e),
    }
}

pub async fn parse_json_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, Error> {
    let status = resp.status();

    if !status.is_success() {
        return Err(into_request_failed_error(resp).await);
    }

    let text = resp.text().await?;
    let data = serde_json::from_str(&text)?;
    Ok(data)
}
