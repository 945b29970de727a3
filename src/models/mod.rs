pub mod post;

pub use post::{FormErrors, NewPost, PostForm, RemotePost};
