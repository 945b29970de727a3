use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::models::{NewPost, RemotePost};

#[derive(Debug, Error)]
pub enum PostsClientError {
    #[error("could not reach the posts API: {0}")]
    Transport(String),

    #[error("unexpected status {0}")]
    UnexpectedStatus(u16),

    #[error("invalid response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for PostsClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

pub type PostsResult<T> = Result<T, PostsClientError>;

/// Thin client for the remote JSON posts collection.
#[derive(Clone)]
pub struct PostsClient {
    client: Client,
    base_url: String,
}

impl PostsClient {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self::with_shared_client(Client::new(), base_url)
    }

    #[must_use]
    pub fn with_shared_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn item_url(&self, id: i64) -> String {
        format!("{}/{}", self.base_url, id)
    }

    /// Any 2xx status is accepted for the collection.
    pub async fn list_posts(&self) -> PostsResult<Vec<RemotePost>> {
        debug!("GET {}", self.base_url);
        let response = self.client.get(&self.base_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PostsClientError::UnexpectedStatus(status.as_u16()));
        }

        decode(response).await
    }

    /// Returns `Ok(None)` when the remote service answers 404.
    pub async fn get_post(&self, id: i64) -> PostsResult<Option<RemotePost>> {
        let url = self.item_url(id);
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;

        match response.status() {
            StatusCode::OK => decode(response).await.map(Some),
            StatusCode::NOT_FOUND => Ok(None),
            other => Err(PostsClientError::UnexpectedStatus(other.as_u16())),
        }
    }

    /// Expects 201 Created and returns the post with its assigned id.
    pub async fn create_post(&self, post: &NewPost) -> PostsResult<RemotePost> {
        debug!("POST {}", self.base_url);
        let response = self.client.post(&self.base_url).json(post).send().await?;

        if response.status() != StatusCode::CREATED {
            return Err(PostsClientError::UnexpectedStatus(
                response.status().as_u16(),
            ));
        }

        decode(response).await
    }

    /// Full replacement of the remote resource; expects 200.
    pub async fn replace_post(&self, post: &RemotePost) -> PostsResult<()> {
        let url = self.item_url(post.id);
        debug!("PUT {}", url);
        let response = self.client.put(&url).json(post).send().await?;

        if response.status() != StatusCode::OK {
            return Err(PostsClientError::UnexpectedStatus(
                response.status().as_u16(),
            ));
        }

        Ok(())
    }

    /// Expects 200; a 404 is reported like any other unexpected status.
    pub async fn delete_post(&self, id: i64) -> PostsResult<()> {
        let url = self.item_url(id);
        debug!("DELETE {}", url);
        let response = self.client.delete(&url).send().await?;

        if response.status() != StatusCode::OK {
            return Err(PostsClientError::UnexpectedStatus(
                response.status().as_u16(),
            ));
        }

        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> PostsResult<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| PostsClientError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> PostsClient {
        PostsClient::new(&format!("{}/posts/", server.uri()))
    }

    #[tokio::test]
    async fn test_get_post_maps_404_to_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts/42"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(client.get_post(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_post_rejects_other_statuses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts/1"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.get_post(1).await.unwrap_err();
        assert!(matches!(err, PostsClientError::UnexpectedStatus(503)));
    }

    #[tokio::test]
    async fn test_create_post_sends_json_and_expects_created() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/posts"))
            .and(body_json(serde_json::json!({
                "title": "Soup", "body": "Hot", "userId": 1
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": 101, "title": "Soup", "body": "Hot", "userId": 1
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let created = client
            .create_post(&NewPost {
                title: "Soup".to_string(),
                body: "Hot".to_string(),
                user_id: 1,
            })
            .await
            .unwrap();
        assert_eq!(created.id, 101);
    }

    #[tokio::test]
    async fn test_list_accepts_any_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(ResponseTemplate::new(203).set_body_json(serde_json::json!([
                {"id": 1, "title": "a", "body": "b", "userId": 1}
            ])))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert_eq!(client.list_posts().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_is_reported() {
        let client = PostsClient::new("http://127.0.0.1:9/posts");
        let err = client.list_posts().await.unwrap_err();
        assert!(matches!(err, PostsClientError::Transport(_)));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.list_posts().await.unwrap_err();
        assert!(matches!(err, PostsClientError::Decode(_)));
    }
}
