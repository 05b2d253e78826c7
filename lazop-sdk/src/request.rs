use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    Get,
    #[default]
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => f.write_str("GET"),
            HttpMethod::Post => f.write_str("POST"),
        }
    }
}

/// 一次api调用的请求
///
/// # Example
/// ```
/// use lazop_sdk::{HttpMethod, Request};
///
/// let mut request = Request::with_method("/orders/get", HttpMethod::Get);
/// request.add_api_parameter("created_after", "2018-02-10T16:00:00+08:00");
/// request.add_api_parameter("limit", "10");
/// assert_eq!(request.api_params().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Request {
    api_name: String,
    http_method: HttpMethod,
    api_params: BTreeMap<String, String>,
    header_params: BTreeMap<String, String>,
    // key -> 本地文件路径，发送的时候才会去读取
    file_params: BTreeMap<String, String>,
    timestamp: Option<i64>,
}

impl Request {
    /// 默认使用POST
    pub fn new(api_name: impl Into<String>) -> Self {
        Self::with_method(api_name, HttpMethod::Post)
    }

    pub fn with_method(api_name: impl Into<String>, http_method: HttpMethod) -> Self {
        Self {
            api_name: api_name.into(),
            http_method,
            api_params: BTreeMap::new(),
            header_params: BTreeMap::new(),
            file_params: BTreeMap::new(),
            timestamp: None,
        }
    }

    pub fn add_api_parameter(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.api_params.insert(key.into(), value.into());
    }

    /// 作为http header发送
    pub fn add_http_parameter(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.header_params.insert(key.into(), value.into());
    }

    /// 添加上传文件，不检查文件是否存在
    ///
    /// 只要有文件参数，请求就会以`multipart/form-data`的形式POST
    pub fn add_file_parameter(&mut self, key: impl Into<String>, file_path: impl Into<String>) {
        self.file_params.insert(key.into(), file_path.into());
    }

    /// 固定签名使用的毫秒时间戳，不设置的话发送时使用当前时间
    pub fn set_timestamp(&mut self, timestamp: i64) {
        self.timestamp = Some(timestamp);
    }

    pub fn api_name(&self) -> &str {
        &self.api_name
    }

    pub fn http_method(&self) -> HttpMethod {
        self.http_method
    }

    pub fn api_params(&self) -> &BTreeMap<String, String> {
        &self.api_params
    }

    pub fn header_params(&self) -> &BTreeMap<String, String> {
        &self.header_params
    }

    pub fn file_params(&self) -> &BTreeMap<String, String> {
        &self.file_params
    }

    pub fn timestamp(&self) -> Option<i64> {
        self.timestamp
    }

    pub(crate) fn is_post(&self) -> bool {
        !self.file_params.is_empty() || self.http_method == HttpMethod::Post
    }
}
