use serde_json::Value;

/// 出错的来源，成功时为空
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseType {
    /// API Service Provider Error
    Isp,
    /// API Request Client Error
    Isv,
    /// Lazop platform Error
    System,
    Other(String),
}

impl From<&str> for ResponseType {
    fn from(s: &str) -> Self {
        match s {
            "ISP" => ResponseType::Isp,
            "ISV" => ResponseType::Isv,
            "SYSTEM" => ResponseType::System,
            other => ResponseType::Other(other.to_owned()),
        }
    }
}

/// api调用的返回结果
///
/// 业务错误（`code`不为`"0"`）不会作为`Err`返回，需要调用方自己检查[`Response::is_success`]
#[derive(Debug, Clone)]
pub struct Response {
    response_type: Option<ResponseType>,
    code: Option<String>,
    message: Option<String>,
    request_id: Option<String>,
    body: Value,
}

impl Response {
    pub fn from_body(body: Value) -> Self {
        let code = match body.get("code") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        let text = |key: &str| body.get(key).and_then(Value::as_str).map(str::to_owned);

        Self {
            response_type: body
                .get("type")
                .and_then(Value::as_str)
                .map(ResponseType::from),
            code,
            message: text("message"),
            request_id: text("request_id"),
            body,
        }
    }

    pub fn response_type(&self) -> Option<&ResponseType> {
        self.response_type.as_ref()
    }

    /// `"0"`表示成功
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// 完整的返回内容，包括`data`等业务字段
    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn into_body(self) -> Value {
        self.body
    }

    pub fn is_success(&self) -> bool {
        self.code.as_deref() == Some("0")
    }
}
