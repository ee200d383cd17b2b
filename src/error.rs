use hyper::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("unsupported url scheme '{0}', expected http or https")]
    UnsupportedScheme(String),

    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("tls error: {0}")]
    Tls(String),

    #[error("http error: {0}")]
    Http(#[from] hyper::Error),

    #[error("failed to build request: {0}")]
    Request(#[from] http::Error),

    #[error("request timed out")]
    Timeout,

    #[error("server responded with {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("response body is not valid UTF-8: {0}")]
    Body(#[from] std::string::FromUtf8Error),

    #[error("response did not contain data.accessToken")]
    MissingToken,

    #[error("failed to write report: {0}")]
    Output(#[from] std::io::Error),
}

impl Error {
    /// True when no HTTP response was obtained at all.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Connect { .. } | Error::Tls(_) | Error::Http(_) | Error::Timeout
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_are_not_transport_errors() {
        let err = Error::Status {
            status: StatusCode::BAD_REQUEST,
            body: r#"{"error":"invalid rating"}"#.to_string(),
        };
        assert!(!err.is_transport());
    }

    #[test]
    fn connect_errors_are_transport_errors() {
        let err = Error::Connect {
            addr: "localhost:8080".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
        };
        assert!(err.is_transport());
        assert!(Error::Timeout.is_transport());
        assert!(!Error::MissingToken.is_transport());
        let bad_body = String::from_utf8(vec![b'o', b'k', 0xff]).unwrap_err();
        assert!(!Error::Body(bad_body).is_transport());
    }
}
