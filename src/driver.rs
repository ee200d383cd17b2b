use std::io::Write;

use http::Method;
use log::{info, warn};

use crate::client::{ApiClient, ApiResponse};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::payload::AuthEnvelope;

pub const REGISTER_PATH: &str = "/api/v1/auth/register";
pub const LOGIN_PATH: &str = "/api/v1/auth/login";
pub const NOTIFICATIONS_PATH: &str = "/api/v1/notifications";

pub fn review_path(product_id: &str) -> String {
    format!("/api/v1/products/{product_id}/reviews")
}

/// Runs the scenario once, writing its report to `out`.
pub struct SmokeDriver<W> {
    client: ApiClient,
    settings: Settings,
    out: W,
}

impl<W: Write> SmokeDriver<W> {
    pub fn new(settings: Settings, out: W) -> Self {
        Self {
            client: ApiClient::new(settings.target.clone()),
            settings,
            out,
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub async fn run(&mut self) -> Result<()> {
        let token = match self.settings.token.clone() {
            Some(token) => {
                info!("using supplied token, skipping registration");
                token
            }
            None => self.obtain_token().await?,
        };

        self.submit_review(&token).await?;
        self.fetch_notifications(&token).await?;
        Ok(())
    }

    /// Registers, falling back to login on any registration failure.
    pub async fn obtain_token(&mut self) -> Result<String> {
        let registration = self.settings.registration.clone();
        let registered = self.authenticate(REGISTER_PATH, &registration).await;
        match registered {
            Ok(token) => {
                writeln!(self.out, "Registered and got Token!")?;
                return Ok(token);
            }
            Err(err) => warn!("registration failed, trying login: {err}"),
        }

        let token = self.authenticate(LOGIN_PATH, &registration.login()).await?;
        writeln!(self.out, "Logged in and got Token!")?;
        Ok(token)
    }

    async fn authenticate<B: serde::Serialize>(&self, path: &str, body: &B) -> Result<String> {
        let res = self
            .client
            .send(Method::POST, path, Some(body), None)
            .await?
            .error_for_status()?;
        res.json::<AuthEnvelope>()?.into_token()
    }

    pub async fn submit_review(&mut self, token: &str) -> Result<()> {
        let path = review_path(&self.settings.product_id);
        let review = self.settings.review.clone();
        let res = self
            .client
            .send(Method::POST, &path, Some(&review), Some(token))
            .await;
        self.report("REVIEW", res)
    }

    pub async fn fetch_notifications(&mut self, token: &str) -> Result<()> {
        let res = self
            .client
            .send::<()>(Method::GET, NOTIFICATIONS_PATH, None, Some(token))
            .await;
        self.report("NOTIF", res)
    }

    /// Prints the outcome; only HTTP error statuses are swallowed.
    fn report(&mut self, label: &str, res: Result<ApiResponse>) -> Result<()> {
        match res.and_then(ApiResponse::error_for_status) {
            Ok(res) => {
                writeln!(self.out, "{label} STATUS: {}", res.status.as_u16())?;
                writeln!(self.out, "{label} BODY: {}", res.body)?;
                Ok(())
            }
            Err(Error::Status { status, body }) => {
                writeln!(self.out, "{label} HTTPError: {}", status.as_u16())?;
                writeln!(self.out, "{label} ERROR BODY: {body}")?;
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}
