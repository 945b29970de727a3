//! Domain service for the remote posts collection.
//!
//! Every operation reports its outcome through the request's [`Flashes`]
//! and degrades to a benign fallback instead of returning an error.

use crate::models::{FormErrors, PostForm, RemotePost};
use crate::web::{CsrfValidator, Flashes};

/// Cache key holding the full list of remote posts.
pub const POSTS_CACHE_KEY: &str = "external_api_posts";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The remote service assigned `id` to the new post.
    Created { id: i64 },
    /// Local validation failed; nothing was sent.
    Invalid { form: PostForm, errors: FormErrors },
    /// The remote call failed; the form should be shown again.
    Failed { form: PostForm },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    Invalid { form: PostForm, errors: FormErrors },
    Failed { form: PostForm },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    InvalidToken,
    Failed,
}

#[async_trait::async_trait]
pub trait PostService: Send + Sync {
    /// Cached list of posts; empty when the remote fetch failed.
    async fn list(&self, flashes: &mut Flashes) -> Vec<RemotePost>;

    /// Single post, or `None` when it is missing or could not be fetched.
    async fn get(&self, id: i64, flashes: &mut Flashes) -> Option<RemotePost>;

    /// Validates `form`, attaches the default owner and creates the post remotely.
    async fn create(&self, form: PostForm, flashes: &mut Flashes) -> CreateOutcome;

    /// Current representation used to pre-fill the edit form.
    async fn load_for_edit(&self, id: i64, flashes: &mut Flashes) -> Option<RemotePost>;

    /// Replaces `current` with the submitted fields (PUT semantics).
    async fn update(
        &self,
        current: &RemotePost,
        form: PostForm,
        flashes: &mut Flashes,
    ) -> UpdateOutcome;

    /// Deletes post `id` once `token` is accepted by `csrf`.
    async fn delete(
        &self,
        id: i64,
        token: &str,
        csrf: &dyn CsrfValidator,
        flashes: &mut Flashes,
    ) -> DeleteOutcome;
}
