//! `reqwest` implementation of [`CustomerBackend`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::backend::errors::{BackendError, BackendResult};
use crate::backend::{AdminToken, CustomerBackend, ListRequest, Pagination};
use crate::domain::admin::{AdminUserUpdate, NewAdminUser};
use crate::domain::customer::PaymentType;
use crate::domain::types::{AdminEmail, AdminUserId, CustomerId};
use crate::models::auth::{LoginEnvelope, LoginRequest, ProfileEnvelope};
use crate::models::config::ServerConfig;
use crate::models::customer::ListEnvelope;
use crate::models::envelope::ActionEnvelope;
use crate::models::users::UsersEnvelope;

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const XLS_MIME: &str = "application/vnd.ms-excel";

/// Envelopes that can report an expired session in their body.
trait SessionAware {
    fn session_rejected(&self) -> bool;
}

impl SessionAware for ListEnvelope {
    fn session_rejected(&self) -> bool {
        self.is_unauthorized()
    }
}

impl SessionAware for ActionEnvelope {
    fn session_rejected(&self) -> bool {
        self.is_unauthorized()
    }
}

impl SessionAware for UsersEnvelope {
    fn session_rejected(&self) -> bool {
        self.is_unauthorized()
    }
}

impl SessionAware for ProfileEnvelope {
    fn session_rejected(&self) -> bool {
        !self.success && self.is_authorized == Some(false)
    }
}

impl SessionAware for LoginEnvelope {
    fn session_rejected(&self) -> bool {
        false
    }
}

#[derive(Serialize)]
struct UpdatePaymentTypeBody<'a> {
    customer_id: &'a str,
    payment_type: u8,
}

#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> BackendResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ServerConfig) -> BackendResult<Self> {
        Self::new(
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// `path` followed by `segment`, percent-encoded as one path segment.
    fn segment_url(&self, path: &str, segment: &str) -> BackendResult<Url> {
        let mut url =
            Url::parse(&self.url(path)).map_err(|err| BackendError::Transport(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| BackendError::Transport(format!("cannot extend url {}", self.base_url)))?
            .push(segment);
        Ok(url)
    }

    async fn send<T>(&self, request: RequestBuilder) -> BackendResult<T>
    where
        T: DeserializeOwned + SessionAware,
    {
        let response = request.send().await.map_err(|err| {
            log::error!("Backend request failed: {err}");
            BackendError::from(err)
        })?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(BackendError::Unauthorized);
        }

        let body = response.bytes().await?;
        let envelope = match serde_json::from_slice::<T>(&body) {
            Ok(envelope) => envelope,
            Err(err) if status.is_success() => {
                log::error!("Failed to decode backend response: {err}");
                return Err(BackendError::from(err));
            }
            Err(_) => {
                log::error!("Backend responded with status {status}");
                return Err(BackendError::Status(status.as_u16()));
            }
        };

        if envelope.session_rejected() {
            return Err(BackendError::Unauthorized);
        }
        Ok(envelope)
    }
}

fn upload_mime(filename: &str) -> &'static str {
    if filename.to_ascii_lowercase().ends_with(".xls") {
        XLS_MIME
    } else {
        XLSX_MIME
    }
}

#[async_trait]
impl CustomerBackend for HttpBackend {
    async fn list_customers(
        &self,
        token: &AdminToken,
        request: ListRequest,
    ) -> BackendResult<ListEnvelope> {
        let query = [
            ("page", request.pagination.page.to_string()),
            ("perPage", request.pagination.per_page.to_string()),
            ("filter", request.status.code().to_string()),
        ];
        self.send(
            self.client
                .get(self.url("customers/list"))
                .bearer_auth(token.as_str())
                .query(&query),
        )
        .await
    }

    async fn update_payment_type(
        &self,
        token: &AdminToken,
        customer_id: &CustomerId,
        payment_type: PaymentType,
    ) -> BackendResult<ActionEnvelope> {
        let body = UpdatePaymentTypeBody {
            customer_id: customer_id.as_str(),
            payment_type: payment_type.code(),
        };
        self.send(
            self.client
                .put(self.url("customers/update-payment-type"))
                .bearer_auth(token.as_str())
                .json(&body),
        )
        .await
    }

    async fn upload_customers(
        &self,
        token: &AdminToken,
        filename: &str,
        bytes: Vec<u8>,
    ) -> BackendResult<ActionEnvelope> {
        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(upload_mime(filename))?;
        let form = Form::new().part("file", part);
        self.send(
            self.client
                .post(self.url("customers/uploadCustomers"))
                .bearer_auth(token.as_str())
                .multipart(form),
        )
        .await
    }

    async fn login(&self, email: &AdminEmail, password: &str) -> BackendResult<LoginEnvelope> {
        let body = LoginRequest {
            email: email.as_str(),
            password,
        };
        self.send(self.client.post(self.url("auth/login")).json(&body))
            .await
    }

    async fn profile(&self, token: &AdminToken) -> BackendResult<ProfileEnvelope> {
        self.send(
            self.client
                .get(self.url("profile/profile"))
                .bearer_auth(token.as_str()),
        )
        .await
    }

    async fn list_users(
        &self,
        token: &AdminToken,
        pagination: Pagination,
    ) -> BackendResult<UsersEnvelope> {
        let query = [
            ("page", pagination.page.to_string()),
            ("perPage", pagination.per_page.to_string()),
        ];
        self.send(
            self.client
                .get(self.url("users/list"))
                .bearer_auth(token.as_str())
                .query(&query),
        )
        .await
    }

    async fn create_user(
        &self,
        token: &AdminToken,
        user: &NewAdminUser,
    ) -> BackendResult<ActionEnvelope> {
        self.send(
            self.client
                .post(self.url("users/create"))
                .bearer_auth(token.as_str())
                .json(user),
        )
        .await
    }

    async fn update_user(
        &self,
        token: &AdminToken,
        id: &AdminUserId,
        update: &AdminUserUpdate,
    ) -> BackendResult<ActionEnvelope> {
        let url = self.segment_url("users/update", id.as_str())?;
        self.send(
            self.client
                .put(url)
                .bearer_auth(token.as_str())
                .json(update),
        )
        .await
    }
}
