//! The `send-email` function seam.
//!
//! [`EmailFunction`] abstracts "invoke a named function with a payload".
//! [`HttpEmailFunction`] calls a remote functions endpoint;
//! [`LocalEmailFunction`] renders and sends in-process over SMTP.

use std::time::Duration;

use async_trait::async_trait;

use super::{templates, EmailError, SendEmailRequest, SEND_EMAIL_FUNCTION};
use crate::delivery::smtp::SmtpMailer;

#[async_trait]
pub trait EmailFunction: Send + Sync {
    /// Invoke the function called `name` with `request` as its body.
    async fn invoke(&self, name: &str, request: &SendEmailRequest) -> Result<(), EmailError>;
}

// ---------------------------------------------------------------------------
// HttpEmailFunction
// ---------------------------------------------------------------------------

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Calls `POST {functions_url}/{name}` with the request as JSON.
pub struct HttpEmailFunction {
    client: reqwest::Client,
    functions_url: String,
    api_key: Option<String>,
}

impl HttpEmailFunction {
    pub fn new(functions_url: impl Into<String>, api_key: Option<String>) -> Result<Self, EmailError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_client(client, functions_url, api_key))
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        functions_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            functions_url: functions_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn url_for(&self, name: &str) -> String {
        format!("{}/{}", self.functions_url, name)
    }
}

#[async_trait]
impl EmailFunction for HttpEmailFunction {
    async fn invoke(&self, name: &str, request: &SendEmailRequest) -> Result<(), EmailError> {
        let mut builder = self.client.post(self.url_for(name)).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(EmailError::Function {
                name: name.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(function = name, to = %request.to, "Email function invoked");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// LocalEmailFunction
// ---------------------------------------------------------------------------

/// Implements `send-email` in-process: render the template, send via SMTP.
pub struct LocalEmailFunction {
    mailer: SmtpMailer,
}

impl LocalEmailFunction {
    pub fn new(mailer: SmtpMailer) -> Self {
        Self { mailer }
    }
}

#[async_trait]
impl EmailFunction for LocalEmailFunction {
    async fn invoke(&self, name: &str, request: &SendEmailRequest) -> Result<(), EmailError> {
        if name != SEND_EMAIL_FUNCTION {
            return Err(EmailError::UnknownFunction(name.to_string()));
        }
        let html = templates::render(&request.template, &request.data)?;
        self.mailer.send_html(&request.to, &request.subject, html).await?;
        Ok(())
    }
}
