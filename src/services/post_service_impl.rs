//! `reqwest`-backed implementation of the `PostService` trait.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::cache::TtlCache;
use crate::clients::posts::{PostsClient, PostsClientError};
use crate::models::{PostForm, RemotePost};
use crate::services::post_service::{
    CreateOutcome, DeleteOutcome, POSTS_CACHE_KEY, PostService, UpdateOutcome,
};
use crate::web::{CsrfValidator, Flashes, delete_scope};

fn record(operation: &'static str, outcome: &'static str) {
    metrics::counter!(
        "remote_posts_requests_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}

pub struct RemotePostService {
    client: PostsClient,
    cache: Arc<TtlCache>,
    cache_ttl: Duration,
    default_user_id: i64,
}

impl RemotePostService {
    #[must_use]
    pub const fn new(
        client: PostsClient,
        cache: Arc<TtlCache>,
        cache_ttl: Duration,
        default_user_id: i64,
    ) -> Self {
        Self {
            client,
            cache,
            cache_ttl,
            default_user_id,
        }
    }
}

#[async_trait]
impl PostService for RemotePostService {
    async fn list(&self, flashes: &mut Flashes) -> Vec<RemotePost> {
        let client = &self.client;
        let mut failure: Option<PostsClientError> = None;
        let failure_slot = &mut failure;

        // A failed fetch caches the empty list for the rest of the TTL.
        let lookup = self
            .cache
            .get_or_compute(POSTS_CACHE_KEY, self.cache_ttl, move || async move {
                match client.list_posts().await {
                    Ok(posts) => posts,
                    Err(e) => {
                        *failure_slot = Some(e);
                        Vec::new()
                    }
                }
            })
            .await;

        if lookup.computed {
            flashes.info("Posts fetched from the API (not found in cache or expired).");
        }

        match failure {
            Some(PostsClientError::UnexpectedStatus(status)) => {
                warn!(status, "Posts API returned an unexpected status");
                record("list", "unexpected_status");
                flashes.error(format!(
                    "The posts API returned an unexpected status: {status}"
                ));
            }
            Some(e) => {
                warn!("Posts API unreachable: {}", e);
                record("list", "transport_error");
                flashes.error(format!("Could not contact the posts API: {e}"));
            }
            None if lookup.computed => {
                info!(count = lookup.value.len(), "Fetched posts from API");
                record("list", "success");
            }
            None => record("list", "cached"),
        }

        lookup.value
    }

    async fn get(&self, id: i64, flashes: &mut Flashes) -> Option<RemotePost> {
        match self.client.get_post(id).await {
            Ok(Some(post)) => {
                record("get", "success");
                Some(post)
            }
            Ok(None) => {
                record("get", "not_found");
                flashes.error(format!("Post not found (ID: {id})."));
                None
            }
            Err(e) => {
                warn!(id, "Failed to fetch post: {}", e);
                record("get", "error");
                flashes.error(format!("Post {id} could not be loaded: {e}"));
                None
            }
        }
    }

    async fn create(&self, form: PostForm, flashes: &mut Flashes) -> CreateOutcome {
        let errors = form.validate();
        if !errors.is_empty() {
            record("create", "invalid");
            flashes.error("Please correct the errors in the form.");
            return CreateOutcome::Invalid { form, errors };
        }

        let payload = form.clone().into_new_post(self.default_user_id);

        match self.client.create_post(&payload).await {
            Ok(created) => {
                info!(id = created.id, "Created remote post");
                record("create", "success");
                flashes.success(format!("Post created successfully (ID: {}).", created.id));
                CreateOutcome::Created { id: created.id }
            }
            Err(PostsClientError::UnexpectedStatus(status)) => {
                record("create", "unexpected_status");
                flashes.error(format!("Error while creating the post: status {status}"));
                CreateOutcome::Failed { form }
            }
            Err(e) => {
                warn!("Failed to create post: {}", e);
                record("create", "error");
                flashes.error(format!("Could not create the post: {e}"));
                CreateOutcome::Failed { form }
            }
        }
    }

    async fn load_for_edit(&self, id: i64, flashes: &mut Flashes) -> Option<RemotePost> {
        match self.client.get_post(id).await {
            Ok(Some(post)) => Some(post),
            Ok(None) | Err(PostsClientError::UnexpectedStatus(_)) => {
                record("load_for_edit", "unavailable");
                flashes.error(format!("Could not load post {id} for editing."));
                None
            }
            Err(e) => {
                warn!(id, "Failed to load post for editing: {}", e);
                record("load_for_edit", "error");
                flashes.error(format!("API error while loading the post: {e}"));
                None
            }
        }
    }

    async fn update(
        &self,
        current: &RemotePost,
        form: PostForm,
        flashes: &mut Flashes,
    ) -> UpdateOutcome {
        let errors = form.validate();
        if !errors.is_empty() {
            record("update", "invalid");
            flashes.error("Please correct the errors in the form.");
            return UpdateOutcome::Invalid { form, errors };
        }

        let replacement = form.clone().into_replacement(current.id, current);

        match self.client.replace_post(&replacement).await {
            Ok(()) => {
                info!(id = current.id, "Updated remote post");
                record("update", "success");
                flashes.success("Post updated successfully.");
                UpdateOutcome::Updated
            }
            Err(PostsClientError::UnexpectedStatus(status)) => {
                record("update", "unexpected_status");
                flashes.error(format!("Error while updating the post: status {status}"));
                UpdateOutcome::Failed { form }
            }
            Err(e) => {
                warn!(id = current.id, "Failed to update post: {}", e);
                record("update", "error");
                flashes.error(format!("Could not update the post: {e}"));
                UpdateOutcome::Failed { form }
            }
        }
    }

    async fn delete(
        &self,
        id: i64,
        token: &str,
        csrf: &dyn CsrfValidator,
        flashes: &mut Flashes,
    ) -> DeleteOutcome {
        if !csrf.is_valid(&delete_scope(id), token).await {
            record("delete", "invalid_token");
            flashes.error("Invalid CSRF token.");
            return DeleteOutcome::InvalidToken;
        }

        match self.client.delete_post(id).await {
            Ok(()) => {
                info!(id, "Deleted remote post");
                record("delete", "success");
                flashes.success("Post deleted successfully.");
                DeleteOutcome::Deleted
            }
            // 404 included: an already-deleted post is still reported as a failure.
            Err(PostsClientError::UnexpectedStatus(status)) => {
                record("delete", "unexpected_status");
                flashes.error(format!("Error while deleting the post: status {status}"));
                DeleteOutcome::Failed
            }
            Err(e) => {
                warn!(id, "Failed to delete post: {}", e);
                record("delete", "error");
                flashes.error(format!("Could not delete the post: {e}"));
                DeleteOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::FlashLevel;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct FixedCsrf(bool);

    #[async_trait]
    impl CsrfValidator for FixedCsrf {
        async fn is_valid(&self, _scope: &str, _token: &str) -> bool {
            self.0
        }
    }

    fn service(server: &MockServer) -> RemotePostService {
        RemotePostService::new(
            PostsClient::new(&format!("{}/posts", server.uri())),
            Arc::new(TtlCache::new()),
            Duration::from_secs(20),
            1,
        )
    }

    fn valid_form() -> PostForm {
        PostForm {
            title: "Ratatouille".to_string(),
            body: "Slow-cooked vegetables".to_string(),
            user_id: None,
        }
    }

    #[tokio::test]
    async fn test_list_is_served_from_cache_on_second_call() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 1, "title": "a", "body": "b", "userId": 1},
                {"id": 2, "title": "c", "body": "d", "userId": 2}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let service = service(&server);

        let mut flashes = Flashes::new();
        let first = service.list(&mut flashes).await;
        assert_eq!(first.len(), 2);
        assert_eq!(flashes.count(FlashLevel::Info), 1);

        let mut flashes = Flashes::new();
        let second = service.list(&mut flashes).await;
        assert_eq!(first, second);
        assert!(flashes.is_empty());
    }

    #[tokio::test]
    async fn test_list_failure_caches_empty_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let service = service(&server);

        let mut flashes = Flashes::new();
        assert!(service.list(&mut flashes).await.is_empty());
        assert_eq!(flashes.count(FlashLevel::Error), 1);

        let mut flashes = Flashes::new();
        assert!(service.list(&mut flashes).await.is_empty());
        assert_eq!(flashes.count(FlashLevel::Error), 0);
    }

    #[tokio::test]
    async fn test_get_not_found_adds_one_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts/99"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let mut flashes = Flashes::new();
        assert!(service(&server).get(99, &mut flashes).await.is_none());
        assert_eq!(flashes.len(), 1);
        assert_eq!(flashes.count(FlashLevel::Error), 1);
    }

    #[tokio::test]
    async fn test_create_success_returns_assigned_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/posts"))
            .and(body_json(serde_json::json!({
                "title": "Ratatouille", "body": "Slow-cooked vegetables", "userId": 1
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": 101, "title": "Ratatouille", "body": "Slow-cooked vegetables", "userId": 1
            })))
            .mount(&server)
            .await;

        let mut flashes = Flashes::new();
        let outcome = service(&server).create(valid_form(), &mut flashes).await;
        assert_eq!(outcome, CreateOutcome::Created { id: 101 });
        assert_eq!(flashes.len(), 1);
        assert_eq!(flashes.count(FlashLevel::Success), 1);
    }

    #[tokio::test]
    async fn test_create_non_created_status_keeps_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/posts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let mut flashes = Flashes::new();
        let outcome = service(&server).create(valid_form(), &mut flashes).await;
        assert_eq!(outcome, CreateOutcome::Failed { form: valid_form() });
        assert_eq!(flashes.len(), 1);
        assert_eq!(flashes.count(FlashLevel::Error), 1);
    }

    #[tokio::test]
    async fn test_create_invalid_form_never_calls_remote() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let mut flashes = Flashes::new();
        let outcome = service(&server)
            .create(PostForm::default(), &mut flashes)
            .await;
        assert!(matches!(outcome, CreateOutcome::Invalid { .. }));
        assert_eq!(flashes.count(FlashLevel::Error), 1);
    }

    #[tokio::test]
    async fn test_update_merges_original_user_id() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/posts/5"))
            .and(body_json(serde_json::json!({
                "id": 5, "title": "Ratatouille", "body": "Slow-cooked vegetables", "userId": 8
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let current = RemotePost {
            id: 5,
            title: "old".to_string(),
            body: "old".to_string(),
            user_id: 8,
        };

        let mut flashes = Flashes::new();
        let outcome = service(&server)
            .update(&current, valid_form(), &mut flashes)
            .await;
        assert_eq!(outcome, UpdateOutcome::Updated);
        assert_eq!(flashes.count(FlashLevel::Success), 1);
    }

    #[tokio::test]
    async fn test_delete_with_invalid_token_skips_remote() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut flashes = Flashes::new();
        let outcome = service(&server)
            .delete(3, "bad", &FixedCsrf(false), &mut flashes)
            .await;
        assert_eq!(outcome, DeleteOutcome::InvalidToken);
        assert_eq!(flashes.len(), 1);
        assert_eq!(flashes.count(FlashLevel::Error), 1);
    }

    #[tokio::test]
    async fn test_delete_statuses() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/posts/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/posts/4"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let service = service(&server);

        let mut flashes = Flashes::new();
        let outcome = service
            .delete(3, "ok", &FixedCsrf(true), &mut flashes)
            .await;
        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert_eq!(flashes.len(), 1);
        assert_eq!(flashes.count(FlashLevel::Success), 1);

        let mut flashes = Flashes::new();
        let outcome = service
            .delete(4, "ok", &FixedCsrf(true), &mut flashes)
            .await;
        assert_eq!(outcome, DeleteOutcome::Failed);
        assert_eq!(flashes.len(), 1);
        assert_eq!(flashes.count(FlashLevel::Error), 1);
    }
}
