use bytes::Bytes;
use http::header::{AUTHORIZATION, CONTENT_TYPE, HOST};
use http::request::Request;
use http::{Method, Version};
use http_body_util::{BodyExt, Full};
use hyper::StatusCode;
use hyper_util::rt::TokioIo;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use url::Url;

use crate::config::Target;
use crate::error::{Error, Result};
use crate::tls;

/// Status and raw body of a completed exchange, whatever the status.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::Status {
                status: self.status,
                body: self.body,
            })
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Issues one request per connection against a fixed base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    target: Target,
}

impl ApiClient {
    pub fn new(target: Target) -> Self {
        if target.base_url.scheme() == "http" && !target.tls_verify {
            warn!(
                "TLS verification is disabled but {} is plain HTTP; the setting has no effect",
                target.base_url
            );
        }
        Self { target }
    }

    /// Joins `path` onto the base URL, keeping any path prefix the base has.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let base = self.target.base_url.as_str().trim_end_matches('/');
        let url = format!("{base}/{}", path.trim_start_matches('/'));
        Url::parse(&url).map_err(|err| Error::InvalidUrl(format!("{url}: {err}")))
    }

    pub async fn send<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        token: Option<&str>,
    ) -> Result<ApiResponse> {
        let url = self.endpoint(path)?;
        info!("{method} request to {url}");

        let fut = self.fetch_res(method, &url, body, token);
        let res = match self.target.timeout {
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .map_err(|_| Error::Timeout)??,
            None => fut.await?,
        };

        debug!("{url} responded with {}", res.status);
        Ok(res)
    }

    async fn fetch_res<B: Serialize>(
        &self,
        method: Method,
        url: &Url,
        body: Option<&B>,
        token: Option<&str>,
    ) -> Result<ApiResponse> {
        let secure = match url.scheme() {
            "http" => false,
            "https" => true,
            other => return Err(Error::UnsupportedScheme(other.to_string())),
        };
        let host = url
            .host_str()
            .ok_or_else(|| Error::InvalidUrl(format!("{url} has no host")))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| Error::UnsupportedScheme(url.scheme().to_string()))?;
        let authority = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        let path = match url.query() {
            Some(query) => format!("{}?{query}", url.path()),
            None => url.path().to_string(),
        };

        let mut builder = Request::builder()
            .version(Version::HTTP_11)
            .method(method)
            .uri(path)
            .header(HOST, authority);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let payload = match body {
            Some(body) => {
                builder = builder.header(CONTENT_TYPE, "application/json");
                Bytes::from(serde_json::to_vec(body)?)
            }
            None => Bytes::new(),
        };
        let req = builder.body(Full::new(payload))?;

        let addr = format!("{host}:{port}");
        let stream = TcpStream::connect(&addr)
            .await
            .map_err(|source| Error::Connect { addr, source })?;

        if secure {
            let server_name = url
                .host()
                .ok_or_else(|| Error::InvalidUrl(format!("{url} has no host")))?;
            exchange(tls::connect(&self.target, server_name, stream).await?, req).await
        } else {
            exchange(stream, req).await
        }
    }
}

async fn exchange<S>(io: S, req: Request<Full<Bytes>>) -> Result<ApiResponse>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(io)).await?;
    tokio::task::spawn(async move {
        if let Err(err) = conn.await {
            warn!("Connection failed: {:?}", err);
        }
    });

    let res = sender.send_request(req).await?;
    let status = res.status();
    let body = res.into_body().collect().await?.to_bytes();

    Ok(ApiResponse {
        status,
        body: String::from_utf8(body.to_vec())?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(Target::new(Url::parse(base).unwrap()))
    }

    #[test]
    fn endpoint_joins_paths() {
        let c = client("http://localhost:8080");
        assert_eq!(
            c.endpoint("/api/v1/notifications").unwrap().as_str(),
            "http://localhost:8080/api/v1/notifications"
        );
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let c = client("http://localhost:8080/shop/");
        assert_eq!(
            c.endpoint("/api/v1/auth/login").unwrap().as_str(),
            "http://localhost:8080/shop/api/v1/auth/login"
        );
    }

    #[test]
    fn error_for_status_keeps_body() {
        let res = ApiResponse {
            status: StatusCode::CONFLICT,
            body: "already exists".to_string(),
        };
        match res.error_for_status() {
            Err(Error::Status { status, body }) => {
                assert_eq!(status, StatusCode::CONFLICT);
                assert_eq!(body, "already exists");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unsupported_scheme_is_rejected() {
        let c = client("ftp://localhost:2121");
        let err = c
            .send::<()>(Method::GET, "/api/v1/notifications", None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedScheme(_)), "got {err:?}");
    }
}
