use reqwest::{Client, StatusCode};
use thiserror::Error;
use uuid::Uuid;

use crate::contacts::{
    dto::{ContactPage, CreateContactRequest},
    Contact,
};
use crate::error::MessageResponse;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server answered {status}: {message}")]
    Status { status: StatusCode, message: String },
}

/// Thin HTTP wrapper over the three contact endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/contacts{}", self.base_url, path)
    }

    pub async fn list(&self, page: i64, limit: i64) -> Result<ContactPage, ClientError> {
        let res = self
            .http
            .get(self.url(""))
            .query(&[("page", page), ("limit", limit)])
            .send()
            .await?;
        Ok(check(res).await?.json().await?)
    }

    pub async fn create(&self, body: &CreateContactRequest) -> Result<Contact, ClientError> {
        let res = self.http.post(self.url("")).json(body).send().await?;
        Ok(check(res).await?.json().await?)
    }

    pub async fn delete(&self, id: Uuid) -> Result<MessageResponse, ClientError> {
        let res = self.http.delete(self.url(&format!("/{id}"))).send().await?;
        Ok(check(res).await?.json().await?)
    }
}

async fn check(res: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let message = match res.json::<MessageResponse>().await {
        Ok(body) => body.message,
        Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
    };
    Err(ClientError::Status { status, message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{app::build_app, state::AppState};

    async fn spawn_server() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = build_app(AppState::fake());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/")
    }

    fn request(name: &str) -> CreateContactRequest {
        CreateContactRequest {
            name: Some(name.into()),
            phone: Some("1234567890".into()),
            email: Some("a@b.c".into()),
        }
    }

    #[tokio::test]
    async fn create_then_list_round_trip() {
        let api = ApiClient::new(spawn_server().await);

        let created = api.create(&request("Grace")).await.unwrap();
        assert_eq!(created.name, "Grace");

        let page = api.list(1, 5).await.unwrap();
        assert_eq!(page.contacts.first().map(|c| c.id), Some(created.id));
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.current_page, 1);
    }

    #[tokio::test]
    async fn errors_carry_status_and_server_message() {
        let api = ApiClient::new(spawn_server().await);

        let err = api.create(&CreateContactRequest::default()).await.unwrap_err();
        match err {
            ClientError::Status { status, message } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(message, "Name, phone and email all fields are required");
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = api.delete(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ClientError::Status { status, .. } if status == StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn delete_confirms() {
        let api = ApiClient::new(spawn_server().await);
        let created = api.create(&request("Linus")).await.unwrap();

        let msg = api.delete(created.id).await.unwrap();
        assert_eq!(msg.message, "Contact Deleted");
        assert!(api.list(1, 5).await.unwrap().contacts.is_empty());
    }
}
