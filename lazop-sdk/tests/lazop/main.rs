use axum::extract::{Form, Multipart, Query};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::routing::{get, post};
use axum::{Json, Router};
use lazop_sdk::recorder::{HTTP_ERROR, RequestOutcome, RequestRecorder};
use lazop_sdk::{Client, ClientConfig, Error, HttpMethod, LogLevel, Request, ResponseType};
use lazop_sdk_common::sign::sign_api_request;
use serde_json::{Value, json};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

const APP_KEY: &str = "100001";
const APP_SECRET: &str = "test-secret";

// region    --- mock gateway
// 校验签名：除`sign`以外的query参数和表单参数一起参与签名
fn verify_sign(api_name: &str, query: &HashMap<String, String>, form: &HashMap<String, String>) -> bool {
    let mut sys: BTreeMap<String, String> = query
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    let Some(sign) = sys.remove("sign") else {
        return false;
    };
    let api: BTreeMap<String, String> = form.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    sign_api_request(APP_SECRET, api_name, &sys, &api) == sign
}

async fn order_get(
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let trace = headers
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    Json(json!({
        "code": "0",
        "type": null,
        "message": "Success",
        "request_id": "abc",
        "sign_ok": verify_sign("/order/get", &query, &HashMap::new()),
        "query": query,
        "raw_query": uri.query(),
        "trace": trace,
    }))
}

async fn token_error() -> Json<Value> {
    Json(json!({
        "code": "IllegalAccessToken",
        "type": "ISV",
        "message": "token invalid",
        "request_id": "e1"
    }))
}

async fn product_create(
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Json<Value> {
    Json(json!({
        "code": "0",
        "request_id": "p1",
        "sign_ok": verify_sign("/product/create", &query, &form),
        "form": form,
        "query_has_payload": query.contains_key("payload"),
        "trace": headers.get("x-trace-id").and_then(|v| v.to_str().ok()),
    }))
}

async fn image_upload(mut multipart: Multipart) -> Json<Value> {
    let mut fields = serde_json::Map::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_owned();
        let file_name = field.file_name().map(str::to_owned);
        let bytes = field.bytes().await.unwrap_or_default();
        fields.insert(
            name,
            json!({
                "file_name": file_name,
                "content": String::from_utf8_lossy(&bytes),
            }),
        );
    }
    Json(json!({"code": "0", "request_id": "u1", "fields": fields}))
}

async fn broken() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "gateway exploded")
}

async fn not_json() -> &'static str {
    "<html>maintenance</html>"
}

fn app() -> Router {
    Router::new()
        .route("/rest/order/get", get(order_get))
        .route("/rest/seller/get", get(token_error).post(token_error))
        .route("/rest/product/create", post(product_create))
        .route("/rest/image/upload", post(image_upload))
        .route("/rest/broken", get(broken))
        .route("/rest/not_json", get(not_json))
}

/// 在随机端口启动mock网关，返回`http://127.0.0.1:<port>/rest/`
async fn start_gateway() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app()).await });
    format!("http://{addr}/rest/")
}
// endregion --- mock gateway

#[derive(Default)]
struct MemoryRecorder {
    records: Mutex<Vec<(String, String, String)>>,
}

impl MemoryRecorder {
    fn records(&self) -> Vec<(String, String, String)> {
        self.records.lock().unwrap().clone()
    }
}

impl RequestRecorder for MemoryRecorder {
    fn record(&self, outcome: &RequestOutcome<'_>) {
        self.records.lock().unwrap().push((
            outcome.url.to_owned(),
            outcome.code.to_owned(),
            outcome.message.to_owned(),
        ));
    }
}

async fn get_client(log_level: LogLevel) -> (Client, Arc<MemoryRecorder>) {
    let recorder = Arc::new(MemoryRecorder::default());
    let client = Client::builder()
        .server_url(start_gateway().await)
        .app_key(APP_KEY)
        .app_secret(APP_SECRET)
        .log_level(log_level)
        .recorder(recorder.clone())
        .build();
    (client, recorder)
}

#[tokio::test]
async fn get_success() {
    let (client, recorder) = get_client(LogLevel::Error).await;
    let mut request = Request::with_method("/order/get", HttpMethod::Get);
    request.add_api_parameter("order_id", "42");
    request.add_api_parameter("note", "a b&c=d");
    request.add_http_parameter("X-Trace-Id", "trace-1");

    let resp = client.execute(&request, Some("token-1")).await.unwrap();
    assert!(resp.is_success());
    assert_eq!(resp.request_id(), Some("abc"));
    assert_eq!(resp.message(), Some("Success"));
    assert_eq!(resp.response_type(), None);

    let body = resp.body();
    assert_eq!(body["sign_ok"], json!(true));
    assert_eq!(body["query"]["order_id"], json!("42"));
    assert_eq!(body["query"]["note"], json!("a b&c=d"));
    assert_eq!(body["query"]["access_token"], json!("token-1"));
    assert_eq!(body["query"]["app_key"], json!(APP_KEY));
    assert_eq!(body["query"]["sign_method"], json!("sha256"));
    assert!(body["query"].get("debug").is_none());
    assert_eq!(body["trace"], json!("trace-1"));
    assert!(body["raw_query"].as_str().unwrap().contains("note=a+b%26c%3Dd"));

    // ERROR级别下成功的请求不记录
    assert!(recorder.records().is_empty());
}

#[tokio::test]
async fn success_marker_on_info() {
    let (client, recorder) = get_client(LogLevel::Info).await;
    let mut request = Request::with_method("/order/get", HttpMethod::Get);
    request.set_timestamp(1_700_000_000_000);

    let resp = client.execute(&request, None).await.unwrap();
    assert!(resp.is_success());
    assert_eq!(resp.body()["query"]["timestamp"], json!("1700000000000"));

    let records = recorder.records();
    assert_eq!(records.len(), 1);
    let (url, code, message) = &records[0];
    assert!(url.contains("/rest/order/get?"));
    assert!(url.contains("timestamp=1700000000000"));
    assert!(code.is_empty());
    assert!(message.is_empty());
}

#[tokio::test]
async fn debug_adds_debug_param() {
    let (client, _recorder) = get_client(LogLevel::Debug).await;
    let request = Request::with_method("/order/get", HttpMethod::Get);
    let resp = client.execute(&request, None).await.unwrap();
    assert_eq!(resp.body()["query"]["debug"], json!("true"));
    assert_eq!(resp.body()["sign_ok"], json!(true));
}

#[tokio::test]
async fn application_error_is_not_err() {
    let (client, recorder) = get_client(LogLevel::Error).await;
    let request = Request::new("/seller/get");

    let resp = client.execute(&request, Some("expired")).await.unwrap();
    assert!(!resp.is_success());
    assert_eq!(resp.code(), Some("IllegalAccessToken"));
    assert_eq!(resp.message(), Some("token invalid"));
    assert_eq!(resp.response_type(), Some(&ResponseType::Isv));
    assert_eq!(resp.request_id(), Some("e1"));

    let records = recorder.records();
    assert_eq!(records.len(), 1);
    assert!(records[0].0.contains("/rest/seller/get?"));
    assert_eq!(records[0].1, "IllegalAccessToken");
    assert_eq!(records[0].2, "token invalid");
}

#[tokio::test]
async fn post_form() {
    let (client, _recorder) = get_client(LogLevel::Error).await;
    let mut request = Request::new("/product/create");
    request.add_api_parameter("payload", "<Request><Product/></Request>");
    request.add_http_parameter("X-Trace-Id", "trace-2");

    let resp = client.execute(&request, Some("token-2")).await.unwrap();
    assert!(resp.is_success());
    let body = resp.body();
    assert_eq!(body["sign_ok"], json!(true));
    assert_eq!(body["form"]["payload"], json!("<Request><Product/></Request>"));
    assert_eq!(body["query_has_payload"], json!(false));
    assert_eq!(body["trace"], json!("trace-2"));
}

#[tokio::test]
async fn multipart_upload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cat.png");
    std::fs::write(&path, "fake image bytes").unwrap();

    let (client, _recorder) = get_client(LogLevel::Error).await;
    // GET也会因为有文件参数而改为POST
    let mut request = Request::with_method("/image/upload", HttpMethod::Get);
    request.add_api_parameter("category", "pets");
    request.add_file_parameter("image", path.to_string_lossy());

    let resp = client.execute(&request, None).await.unwrap();
    assert!(resp.is_success());
    let fields = &resp.body()["fields"];
    assert_eq!(fields["category"]["content"], json!("pets"));
    assert_eq!(fields["image"]["file_name"], json!("cat.png"));
    assert_eq!(fields["image"]["content"], json!("fake image bytes"));
}

#[tokio::test]
async fn missing_upload_file_is_http_error() {
    let (client, recorder) = get_client(LogLevel::Error).await;
    let mut request = Request::new("/image/upload");
    request.add_file_parameter("image", "/definitely/not/here.png");

    let res = client.execute(&request, None).await;
    assert!(matches!(res, Err(Error::IO(_))));
    let records = recorder.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].1, HTTP_ERROR);
}

#[tokio::test]
async fn non_2xx_is_http_error() {
    let (client, recorder) = get_client(LogLevel::Error).await;
    let request = Request::with_method("/broken", HttpMethod::Get);

    let res = client.execute(&request, None).await;
    match res {
        Err(Error::RequestAPIFailed { status, message }) => {
            assert!(status.starts_with("500"));
            assert_eq!(message, "gateway exploded");
        }
        other => panic!("unexpected result: {other:?}"),
    }
    let records = recorder.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].1, HTTP_ERROR);
    assert!(records[0].2.contains("gateway exploded"));
}

#[tokio::test]
async fn malformed_json_is_http_error() {
    let (client, recorder) = get_client(LogLevel::Error).await;
    let request = Request::with_method("/not_json", HttpMethod::Get);

    let res = client.execute(&request, None).await;
    assert!(matches!(res, Err(Error::Json(_))));
    assert_eq!(recorder.records()[0].1, HTTP_ERROR);
}

#[tokio::test]
async fn connection_refused_is_http_error() {
    // 先占用一个端口再释放，保证没有服务在监听
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let recorder = Arc::new(MemoryRecorder::default());
    let client = Client::builder()
        .server_url(format!("http://{addr}/rest"))
        .app_key(APP_KEY)
        .app_secret(APP_SECRET)
        .recorder(recorder.clone())
        .build();

    let res = client
        .execute(&Request::with_method("/order/get", HttpMethod::Get), None)
        .await;
    assert!(matches!(res, Err(Error::Reqwest(_))));
    assert_eq!(recorder.records()[0].1, HTTP_ERROR);
}

// region    --- live
#[derive(serde::Deserialize)]
struct LiveConfig {
    #[serde(flatten)]
    client: ClientConfig,
    access_token: String,
}

fn get_live_client() -> (Client, String) {
    let file_str = std::fs::read_to_string("tests/lazop/config.toml").unwrap();
    let conf = toml::from_str::<LiveConfig>(&file_str).unwrap();
    (Client::from_config(conf.client, None), conf.access_token)
}

#[tokio::test]
#[ignore]
async fn live_seller_get() {
    let (client, token) = get_live_client();
    let request = Request::with_method("/seller/get", HttpMethod::Get);
    match client.execute(&request, Some(&token)).await {
        Ok(resp) => println!("[success] res:\n{:#?}", resp.body()),
        Err(e) => println!("[error] {:#?}", e),
    }
}
// endregion --- live
