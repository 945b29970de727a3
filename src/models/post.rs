use serde::{Deserialize, Serialize};

/// Owning user assumed when the remote service omits `userId`.
pub const DEFAULT_USER_ID: i64 = 1;

const MAX_TITLE_LENGTH: usize = 255;

/// A post as held by the remote collection resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemotePost {
    #[serde(default)]
    pub id: i64,

    pub title: String,

    pub body: String,

    #[serde(rename = "userId", default = "default_user_id")]
    pub user_id: i64,
}

const fn default_user_id() -> i64 {
    DEFAULT_USER_ID
}

/// Body sent on create; the remote service assigns the id.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    #[serde(rename = "userId")]
    pub user_id: i64,
}

/// Fields submitted from the create and edit forms.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct PostForm {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub body: String,

    /// Raw owner field; parsed during validation so a bad value is reported
    /// on the form instead of rejecting the request.
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub title: Option<String>,
    pub body: Option<String>,
    pub user_id: Option<String>,
}

impl FormErrors {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none() && self.user_id.is_none()
    }
}

impl PostForm {
    #[must_use]
    pub fn from_post(post: &RemotePost) -> Self {
        Self {
            title: post.title.clone(),
            body: post.body.clone(),
            user_id: Some(post.user_id.to_string()),
        }
    }

    /// Blank means no owner was submitted.
    fn owner(&self) -> Result<Option<i64>, std::num::ParseIntError> {
        match self.user_id.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => value.parse().map(Some),
        }
    }

    /// Title and body are both required; the owner must be numeric when given.
    #[must_use]
    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::default();

        let title = self.title.trim();
        if title.is_empty() {
            errors.title = Some("Title is required".to_string());
        } else if title.chars().count() > MAX_TITLE_LENGTH {
            errors.title = Some(format!(
                "Title must be {MAX_TITLE_LENGTH} characters or less"
            ));
        }

        if self.body.trim().is_empty() {
            errors.body = Some("Body is required".to_string());
        }

        if self.owner().is_err() {
            errors.user_id = Some("User ID must be a number".to_string());
        }

        errors
    }

    #[must_use]
    pub fn into_new_post(self, user_id: i64) -> NewPost {
        NewPost {
            title: self.title.trim().to_string(),
            body: self.body.trim().to_string(),
            user_id,
        }
    }

    /// Full replacement for `id`, keeping the submitted owner or falling back
    /// to the one currently stored remotely.
    #[must_use]
    pub fn into_replacement(self, id: i64, current: &RemotePost) -> RemotePost {
        RemotePost {
            id,
            title: self.title.trim().to_string(),
            body: self.body.trim().to_string(),
            user_id: self.owner().ok().flatten().unwrap_or(current.user_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_user_id_defaults() {
        let post: RemotePost =
            serde_json::from_str(r#"{"id": 3, "title": "t", "body": "b"}"#).unwrap();
        assert_eq!(post.user_id, DEFAULT_USER_ID);

        let post: RemotePost =
            serde_json::from_str(r#"{"id": 3, "title": "t", "body": "b", "userId": 7}"#).unwrap();
        assert_eq!(post.user_id, 7);
    }

    #[test]
    fn test_new_post_serializes_user_id_camel_case() {
        let form = PostForm {
            title: "  Hello ".to_string(),
            body: "World".to_string(),
            user_id: None,
        };
        let json = serde_json::to_value(form.into_new_post(1)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"title": "Hello", "body": "World", "userId": 1})
        );
    }

    #[test]
    fn test_validate_requires_title_and_body() {
        let errors = PostForm::default().validate();
        assert!(errors.title.is_some());
        assert!(errors.body.is_some());

        let form = PostForm {
            title: "x".repeat(256),
            body: "ok".to_string(),
            user_id: None,
        };
        let errors = form.validate();
        assert!(errors.title.is_some());
        assert!(errors.body.is_none());

        let form = PostForm {
            title: "Title".to_string(),
            body: "Body".to_string(),
            user_id: None,
        };
        assert!(form.validate().is_empty());
    }

    #[test]
    fn test_replacement_keeps_current_owner_when_form_has_none() {
        let current = RemotePost {
            id: 4,
            title: "old".to_string(),
            body: "old".to_string(),
            user_id: 9,
        };
        let form = PostForm {
            title: "new".to_string(),
            body: "new body".to_string(),
            user_id: None,
        };
        let replacement = form.into_replacement(4, &current);
        assert_eq!(replacement.user_id, 9);
        assert_eq!(replacement.title, "new");

        let form = PostForm {
            title: "new".to_string(),
            body: "new body".to_string(),
            user_id: Some(" 2 ".to_string()),
        };
        assert_eq!(form.into_replacement(4, &current).user_id, 2);
    }

    #[test]
    fn test_blank_user_id_passes_validation() {
        let form: PostForm = serde_json::from_value(serde_json::json!({
            "title": "a", "body": "b", "user_id": ""
        }))
        .unwrap();
        assert!(form.validate().is_empty());
    }

    #[test]
    fn test_non_numeric_user_id_is_a_field_error() {
        let form = PostForm {
            title: "Title".to_string(),
            body: "Body".to_string(),
            user_id: Some("abc".to_string()),
        };
        let errors = form.validate();
        assert!(!errors.is_empty());
        assert_eq!(errors.user_id.as_deref(), Some("User ID must be a number"));
        assert!(errors.title.is_none());
    }
}
