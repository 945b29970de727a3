pub mod post_service;
pub mod post_service_impl;
pub use post_service::{
    CreateOutcome, DeleteOutcome, POSTS_CACHE_KEY, PostService, UpdateOutcome,
};
pub use post_service_impl::RemotePostService;

pub mod slow_task;
pub use slow_task::{SLOW_TASK_CACHE_KEY, SlowTaskService};
