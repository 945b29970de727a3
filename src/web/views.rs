//! Server-rendered HTML pages.
//!
//! Every interpolated value goes through `html_escape` before it reaches
//! the page.

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use std::fmt::Write;

use super::flash::Flash;
use crate::models::{FormErrors, PostForm, RemotePost};

const STYLES: &str = r"
body { font-family: system-ui, sans-serif; margin: 0; background: #f7f7f5; color: #222; }
nav { background: #2f3e46; padding: 0.75rem 1.5rem; }
nav a { color: #fff; margin-right: 1rem; text-decoration: none; }
main { max-width: 960px; margin: 1.5rem auto; padding: 0 1rem; }
.flash { padding: 0.6rem 1rem; border-radius: 6px; margin-bottom: 0.5rem; }
.flash-info { background: #e0f0ff; }
.flash-success { background: #dff5e1; }
.flash-warning { background: #fff4d6; }
.flash-error { background: #fde2e2; }
.field-error { color: #b00020; font-size: 0.875rem; }
label { display: block; margin-top: 0.75rem; font-weight: 600; }
input[type=text], textarea { width: 100%; padding: 0.5rem; box-sizing: border-box; }
table { width: 100%; border-collapse: collapse; }
td, th { border-bottom: 1px solid #ddd; padding: 0.5rem; text-align: left; }
";

/// Counts shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct DashboardCounts {
    pub recipes: u64,
    pub ingredients: u64,
    pub favorites: u64,
}

fn layout(title: &str, flashes: &[Flash], content: &str) -> String {
    let mut html = String::with_capacity(content.len() + 2048);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{}</title>", text(title));
    let _ = writeln!(html, "<style>{STYLES}</style>");
    html.push_str("</head>\n<body>\n<nav>");
    html.push_str("<a href=\"/admin\">Dashboard</a>");
    html.push_str("<a href=\"/external/posts/\">Posts</a>");
    html.push_str("<a href=\"/external/posts/new\">New post</a>");
    html.push_str("</nav>\n<main>\n");

    for flash in flashes {
        let _ = writeln!(
            html,
            "<div class=\"flash flash-{}\" role=\"alert\">{}</div>",
            flash.level.as_str(),
            text(&flash.message)
        );
    }

    html.push_str(content);
    html.push_str("\n</main>\n</body>\n</html>\n");
    html
}

fn delete_form(id: i64, token: &str) -> String {
    format!(
        "<form method=\"post\" action=\"/external/posts/{id}\">\
         <input type=\"hidden\" name=\"_token\" value=\"{}\">\
         <button type=\"submit\">Delete</button></form>",
        attr(token)
    )
}

fn post_fields(form: &PostForm, errors: &FormErrors) -> String {
    let mut html = String::new();

    html.push_str("<label for=\"title\">Title</label>");
    let _ = write!(
        html,
        "<input type=\"text\" id=\"title\" name=\"title\" required value=\"{}\">",
        attr(&form.title)
    );
    if let Some(error) = &errors.title {
        let _ = write!(html, "<p class=\"field-error\">{}</p>", text(error));
    }

    html.push_str("<label for=\"body\">Body</label>");
    let _ = write!(
        html,
        "<textarea id=\"body\" name=\"body\" rows=\"5\" required>{}</textarea>",
        text(&form.body)
    );
    if let Some(error) = &errors.body {
        let _ = write!(html, "<p class=\"field-error\">{}</p>", text(error));
    }

    if let Some(user_id) = form.user_id.as_deref().filter(|v| !v.trim().is_empty()) {
        let _ = write!(
            html,
            "<input type=\"hidden\" name=\"user_id\" value=\"{}\">",
            attr(user_id)
        );
    }
    if let Some(error) = &errors.user_id {
        let _ = write!(html, "<p class=\"field-error\">{}</p>", text(error));
    }

    html
}

#[must_use]
pub fn render_posts_index(posts: &[RemotePost], flashes: &[Flash]) -> String {
    let mut content = String::from("<h1>Posts</h1>\n");
    content.push_str("<p><a href=\"/external/posts/new\">Create a post</a></p>\n");

    if posts.is_empty() {
        content.push_str("<p>No posts to show.</p>\n");
    } else {
        content.push_str("<table>\n<thead><tr><th>ID</th><th>Title</th><th></th></tr></thead>\n<tbody>\n");
        for post in posts {
            let _ = writeln!(
                content,
                "<tr><td>{id}</td><td><a href=\"/external/posts/{id}\">{title}</a></td>\
                 <td><a href=\"/external/posts/{id}/edit\">Edit</a></td></tr>",
                id = post.id,
                title = text(&post.title)
            );
        }
        content.push_str("</tbody>\n</table>\n");
    }

    layout("Posts", flashes, &content)
}

#[must_use]
pub fn render_post_show(
    id: i64,
    post: &RemotePost,
    delete_token: &str,
    flashes: &[Flash],
) -> String {
    let mut content = String::new();
    let _ = writeln!(content, "<h1>{}</h1>", text(&post.title));
    let _ = writeln!(
        content,
        "<p class=\"meta\">Post #{id} by user {}</p>",
        post.user_id
    );
    let _ = writeln!(content, "<article>{}</article>", text(&post.body));
    let _ = writeln!(
        content,
        "<p><a href=\"/external/posts/\">Back to list</a> | \
         <a href=\"/external/posts/{id}/edit\">Edit</a></p>"
    );
    content.push_str(&delete_form(id, delete_token));

    layout(&post.title, flashes, &content)
}

#[must_use]
pub fn render_post_new(form: &PostForm, errors: &FormErrors, flashes: &[Flash]) -> String {
    let mut content = String::from("<h1>New post</h1>\n");
    content.push_str("<form method=\"post\" action=\"/external/posts/new\">");
    content.push_str(&post_fields(form, errors));
    content.push_str("<p><button type=\"submit\">Save</button></p></form>\n");
    content.push_str("<p><a href=\"/external/posts/\">Back to list</a></p>\n");

    layout("New post", flashes, &content)
}

#[must_use]
pub fn render_post_edit(
    id: i64,
    form: &PostForm,
    errors: &FormErrors,
    delete_token: &str,
    flashes: &[Flash],
) -> String {
    let mut content = String::new();
    let _ = writeln!(content, "<h1>Edit post #{id}</h1>");
    let _ = write!(
        content,
        "<form method=\"post\" action=\"/external/posts/{id}/edit\">"
    );
    content.push_str(&post_fields(form, errors));
    content.push_str("<p><button type=\"submit\">Update</button></p></form>\n");
    content.push_str(&delete_form(id, delete_token));
    let _ = writeln!(
        content,
        "<p><a href=\"/external/posts/{id}\">Cancel</a></p>"
    );

    layout("Edit post", flashes, &content)
}

#[must_use]
pub fn render_dashboard(title: &str, counts: DashboardCounts) -> String {
    let mut content = String::new();
    let _ = writeln!(content, "<h1>{}</h1>", text(title));
    content.push_str("<ul class=\"menu\">\n");
    content.push_str("<li><a href=\"/admin\">Dashboard</a></li>\n");
    content.push_str("<li><a href=\"/admin/api/ingredients\">Ingredients</a></li>\n");
    content.push_str("<li><a href=\"/admin/api/recipes\">Recipes</a></li>\n");
    content.push_str("</ul>\n");
    let _ = writeln!(
        content,
        "<p>{} recipes ({} favorites), {} ingredients.</p>",
        counts.recipes, counts.favorites, counts.ingredients
    );

    layout(title, &[], &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::flash::FlashLevel;

    fn post() -> RemotePost {
        RemotePost {
            id: 7,
            title: "<b>Tarte</b>".to_string(),
            body: "Pommes & sucre".to_string(),
            user_id: 3,
        }
    }

    #[test]
    fn test_show_escapes_content() {
        let html = render_post_show(7, &post(), "tok\"en", &[]);
        assert!(html.contains("&lt;b&gt;Tarte&lt;/b&gt;"));
        assert!(html.contains("Pommes &amp; sucre"));
        assert!(html.contains("value=\"tok&quot;en\""));
        assert!(!html.contains("<b>Tarte</b>"));
    }

    #[test]
    fn test_flashes_are_rendered_with_level() {
        let flashes = vec![Flash {
            level: FlashLevel::Error,
            message: "Oops <x>".to_string(),
        }];
        let html = render_posts_index(&[], &flashes);
        assert!(html.contains("flash-error"));
        assert!(html.contains("Oops &lt;x&gt;"));
        assert!(html.contains("No posts to show."));
    }

    #[test]
    fn test_edit_form_keeps_values_and_errors() {
        let form = PostForm {
            title: String::new(),
            body: "kept body".to_string(),
            user_id: Some("3".to_string()),
        };
        let errors = form.validate();
        let html = render_post_edit(7, &form, &errors, "t", &[]);
        assert!(html.contains("kept body"));
        assert!(html.contains("Title is required"));
        assert!(html.contains("name=\"user_id\" value=\"3\""));
        assert!(html.contains("action=\"/external/posts/7/edit\""));
    }

    #[test]
    fn test_show_delete_form_targets_requested_id() {
        let mut remote = post();
        remote.id = 0;
        let html = render_post_show(7, &remote, "t", &[]);
        assert!(html.contains("action=\"/external/posts/7\""));
        assert!(html.contains("href=\"/external/posts/7/edit\""));
        assert!(!html.contains("/external/posts/0"));
    }
}
