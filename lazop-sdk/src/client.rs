use crate::recorder::{HTTP_ERROR, RequestOutcome, RequestRecorder, TracingRecorder};
use crate::{ClientConfig, Error, LogLevel, Request, Response};
use bon::bon;
use lazop_sdk_common::helper::{into_header_map, now_millis, parse_json_response};
use lazop_sdk_common::sign::{SIGN_METHOD, sign_api_request};
use reqwest::RequestBuilder;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use url::Url;

/// 标识本sdk的partner_id
pub const PARTNER_ID: &str = "lazop-sdk-rust-20180426";

pub struct Client {
    server_url: String,
    app_key: String,
    app_secret: String,
    log_level: LogLevel,
    recorder: Arc<dyn RequestRecorder>,
    http_client: reqwest::Client,
}

#[bon]
impl Client {
    /// - `server_url`: 网关地址，可以使用[`Endpoint::url`](crate::Endpoint::url)
    /// - `recorder`: 不设置的话使用[`TracingRecorder`]
    #[builder(on(String, into))]
    pub fn new(
        server_url: String,
        app_key: String,
        app_secret: String,
        #[builder(default)] log_level: LogLevel,
        recorder: Option<Arc<dyn RequestRecorder>>,
    ) -> Self {
        Self {
            server_url,
            app_key,
            app_secret,
            log_level,
            recorder: recorder.unwrap_or_else(|| Arc::new(TracingRecorder)),
            http_client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: ClientConfig, recorder: Option<Arc<dyn RequestRecorder>>) -> Self {
        Client::builder()
            .server_url(config.server_url.url())
            .app_key(config.app_key)
            .app_secret(config.app_secret)
            .log_level(config.log_level)
            .maybe_recorder(recorder)
            .build()
    }

    pub fn set_log_level(&mut self, log_level: LogLevel) {
        self.log_level = log_level;
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn app_key(&self) -> &str {
        &self.app_key
    }

    /// 签名并发送请求
    ///
    /// - `access_token`: 需要授权的api必须传入
    ///
    /// 网络错误、http状态码不是2xx、返回内容不是json时返回`Err`，并以[`HTTP_ERROR`]记录；
    /// 业务错误不会返回`Err`，需要检查[`Response::is_success`]
    pub async fn execute(
        &self,
        request: &Request,
        access_token: Option<&str>,
    ) -> Result<Response, Error> {
        let sys_params = self.system_params(request, access_token);
        let url_ = full_url(&self.server_url, request.api_name(), &sys_params)?;

        let body = match self.dispatch(url_.clone(), request).await {
            Ok(body) => body,
            Err(e) => {
                self.recorder.record(&RequestOutcome {
                    url: url_.as_str(),
                    code: HTTP_ERROR,
                    message: &e.to_string(),
                });
                return Err(e);
            }
        };

        let response = Response::from_body(body);
        match response.code() {
            Some(code) if code != "0" => {
                self.recorder.record(&RequestOutcome {
                    url: url_.as_str(),
                    code,
                    message: response.message().unwrap_or_default(),
                });
            }
            _ => {
                if self.log_level >= LogLevel::Info {
                    self.recorder.record(&RequestOutcome {
                        url: url_.as_str(),
                        code: "",
                        message: "",
                    });
                }
            }
        }

        Ok(response)
    }

    /// 系统参数，已经包含`sign`
    pub(crate) fn system_params(
        &self,
        request: &Request,
        access_token: Option<&str>,
    ) -> BTreeMap<String, String> {
        let timestamp = request.timestamp().unwrap_or_else(now_millis);

        let mut sys_params = BTreeMap::new();
        sys_params.insert("app_key".to_owned(), self.app_key.clone());
        sys_params.insert("partner_id".to_owned(), PARTNER_ID.to_owned());
        sys_params.insert("timestamp".to_owned(), timestamp.to_string());
        sys_params.insert("sign_method".to_owned(), SIGN_METHOD.to_owned());
        if self.log_level == LogLevel::Debug {
            sys_params.insert("debug".to_owned(), "true".to_owned());
        }
        if let Some(token) = access_token {
            sys_params.insert("access_token".to_owned(), token.to_owned());
        }

        let sign = sign_api_request(
            &self.app_secret,
            request.api_name(),
            &sys_params,
            request.api_params(),
        );
        sys_params.insert("sign".to_owned(), sign);
        sys_params
    }

    async fn dispatch(&self, url_: Url, request: &Request) -> Result<Value, Error> {
        let headers = into_header_map(request.header_params())?;
        let builder = if request.is_post() {
            self.post_builder(url_, request).await?
        } else {
            self.get_builder(url_, request)
        };

        let resp = builder.headers(headers).send().await?;
        let body = parse_json_response(resp).await?;
        Ok(body)
    }

    fn get_builder(&self, mut url_: Url, request: &Request) -> RequestBuilder {
        if !request.api_params().is_empty() {
            url_.query_pairs_mut().extend_pairs(request.api_params());
        }
        tracing::debug!(api = request.api_name(), url = %url_, "send lazop GET request");
        self.http_client.get(url_)
    }

    async fn post_builder(&self, url_: Url, request: &Request) -> Result<RequestBuilder, Error> {
        tracing::debug!(
            api = request.api_name(),
            url = %url_,
            files = request.file_params().len(),
            "send lazop POST request"
        );
        if request.file_params().is_empty() {
            return Ok(self.http_client.post(url_).form(request.api_params()));
        }

        let mut form = Form::new();
        for (k, v) in request.api_params() {
            form = form.text(k.clone(), v.clone());
        }
        for (k, path) in request.file_params() {
            let bytes = tokio::fs::read(path).await?;
            let file_name = Path::new(path)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| k.clone());
            form = form.part(k.clone(), Part::bytes(bytes).file_name(file_name));
        }
        Ok(self.http_client.post(url_).multipart(form))
    }
}

/// 保证`server_url`和`api_name`之间有且只有一个`/`
pub(crate) fn rest_url(server_url: &str, api_name: &str) -> String {
    format!(
        "{}/{}",
        server_url.trim_end_matches('/'),
        api_name.trim_start_matches('/')
    )
}

/// 系统参数以`application/x-www-form-urlencoded`编码后拼在query中
pub(crate) fn full_url(
    server_url: &str,
    api_name: &str,
    sys_params: &BTreeMap<String, String>,
) -> Result<Url, Error> {
    let url_ = Url::parse_with_params(&rest_url(server_url, api_name), sys_params)?;
    Ok(url_)
}
