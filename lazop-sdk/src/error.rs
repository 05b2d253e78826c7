#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("error: {0}")]
    Common(String),
    #[error("request api failed: {status}, message: {message}")]
    RequestAPIFailed { status: String, message: String },
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
    #[error("io error: {0}")]
    IO(#[from] std::io::Error),
}

impl From<lazop_sdk_common::Error> for Error {
    fn from(e: lazop_sdk_common::Error) -> Self {
        use lazop_sdk_common::Error as CommonError;
        match e {
            CommonError::Common(s) => Error::Common(s),
            CommonError::RequestAPIFailed { status, message } => {
                Error::RequestAPIFailed { status, message }
            }
            CommonError::Reqwest(e) => Error::Reqwest(e),
            CommonError::Json(e) => Error::Json(e),
        }
    }
}
