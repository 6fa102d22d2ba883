use actix_session::Session;
use actix_web::http::header::ContentType;
use actix_web::HttpResponse;
use askama::Template;

use crate::app::AppError;
use crate::auth;
use crate::database::models::comment::Comment;
use crate::database::models::post::BlogPost;
use crate::forms::{FieldError, LoginForm, PostForm, RegisterForm};

/// Session-derived state the base layout shows on every page: the pending
/// flash message (consumed here, so it renders exactly once) and which nav
/// links apply.
pub struct PageChrome {
    pub flash: Option<String>,
    pub logged_in: bool,
    pub is_admin: bool,
}

impl PageChrome {
    pub fn from_session(session: &Session) -> Self {
        Self {
            flash: auth::take_flash(session),
            logged_in: auth::current_user_id(session).is_some(),
            is_admin: auth::is_admin(session),
        }
    }
}

/// Renders a template into a 200 html response.
pub fn html<T: Template>(template: &T) -> Result<HttpResponse, AppError> {
    let body = template.render()?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body))
}

/// Front page, every post with its author's name.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub chrome: PageChrome,
    pub posts: Vec<(BlogPost, String)>,
}

/// A single post, its comments (paired with the commentator's name) and
/// the comment form. `errors` is only non-empty when a comment submission
/// came back for fixing.
#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate {
    pub chrome: PageChrome,
    pub post: BlogPost,
    pub author: String,
    pub comments: Vec<(Comment, String)>,
    pub errors: Vec<FieldError>,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub chrome: PageChrome,
    pub form: RegisterForm,
    pub errors: Vec<FieldError>,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub chrome: PageChrome,
    pub form: LoginForm,
}

/// Shared by new-post and edit-post; `action` is the url the form posts
/// back to and `heading` tells the two apart.
#[derive(Template)]
#[template(path = "make-post.html")]
pub struct MakePostTemplate {
    pub chrome: PageChrome,
    pub heading: &'static str,
    pub action: String,
    pub form: PostForm,
    pub errors: Vec<FieldError>,
}

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub chrome: PageChrome,
}

#[derive(Template)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub chrome: PageChrome,
}
