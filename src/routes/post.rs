use actix_session::Session;
use actix_web::{
    get, post,
    web::{Data, Form},
    HttpRequest, HttpResponse,
};

use super::see_other;
use crate::{
    app::{AppError, AppState},
    auth,
    database::models::{comment::*, post::*, user::*},
    forms::{FieldError, PostForm},
    templates::{html, IndexTemplate, MakePostTemplate, PageChrome, PostTemplate},
};

const DUPLICATE_TITLE_MESSAGE: &str = "That title is already used.";

/// Pipe for the front page
/// - url: `{domain}/`
///
/// # Response
/// ## Ok
/// - every post, oldest first, each with its author's name
/// ## Error
/// - Internal server error
#[get("/")]
pub async fn get_all_posts(
    session: Session,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let mut conn = app_state.pool.get()?;
    let posts = BlogPost::all(&mut conn)?;

    html(&IndexTemplate {
        chrome: PageChrome::from_session(&session),
        posts,
    })
}

/// Pipe for reading a single post
/// - url: `{domain}/post/{post_id}`
///
/// # Response
/// ## Ok
/// - the post, its comments and the comment form
/// ## Error
/// - Bad request (non numeric id)
/// - Not found
/// - Internal server error
#[get("/post/{post_id}")]
pub async fn show_post(
    req: HttpRequest,
    session: Session,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let post_id = req.match_info().query("post_id").parse::<i32>()?;
    let mut conn = app_state.pool.get()?;

    let (post, author) = BlogPost::find_with_author(&mut conn, post_id)?;
    let comments = Comment::find_by_post(&mut conn, post_id)?;

    html(&PostTemplate {
        chrome: PageChrome::from_session(&session),
        post,
        author,
        comments,
        errors: Vec::new(),
    })
}

/// Pipe for showing the new post form, admin only
/// - url: `{domain}/new-post`
#[get("/new-post")]
pub async fn new_post_form(session: Session) -> Result<HttpResponse, AppError> {
    auth::require_admin(&session)?;

    html(&MakePostTemplate {
        chrome: PageChrome::from_session(&session),
        heading: "New Post",
        action: String::from("/new-post"),
        form: PostForm::default(),
        errors: Vec::new(),
    })
}

/// Pipe for publishing a post, admin only
/// - url: `{domain}/new-post`
///
/// # HTTP request requirements
/// ## body
/// - url encoded form containing `title`, `subtitle`, `img_url` and `body`
///   fields
///
/// # Response
/// ## Ok
/// - redirect to `/` with the post published and dated today
/// - the form again, with inline messages, if validation fails or the
///   title is taken
/// ## Error
/// - Forbidden
/// - Internal server error
#[post("/new-post")]
pub async fn create_post(
    session: Session,
    form: Form<PostForm>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let admin_id = auth::require_admin(&session)?;
    let form = form.into_inner();

    let mut errors = form.validate();
    if errors.is_empty() {
        let mut conn = app_state.pool.get()?;
        let author = User::find_by_id(&mut conn, admin_id)?;

        match BlogPost::new(
            &mut conn,
            &author,
            form.title.trim(),
            form.subtitle.trim(),
            form.img_url.trim(),
            &form.body,
        ) {
            Ok(_) => return Ok(see_other("/")),
            Err(AppError::DuplicateTitle) => {
                errors.push(FieldError::new("title", DUPLICATE_TITLE_MESSAGE))
            }
            Err(other) => return Err(other),
        }
    }

    html(&MakePostTemplate {
        chrome: PageChrome::from_session(&session),
        heading: "New Post",
        action: String::from("/new-post"),
        form,
        errors,
    })
}

/// Pipe for showing the edit form prefilled, admin only
/// - url: `{domain}/edit-post{post_id}`
#[get("/edit-post{post_id}")]
pub async fn edit_post_form(
    req: HttpRequest,
    session: Session,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    auth::require_admin(&session)?;
    let post_id = req.match_info().query("post_id").parse::<i32>()?;

    let mut conn = app_state.pool.get()?;
    let post = BlogPost::find_by_id(&mut conn, post_id)?;

    html(&MakePostTemplate {
        chrome: PageChrome::from_session(&session),
        heading: "Edit Post",
        action: format!("/edit-post{}", post.id),
        form: PostForm {
            title: post.title,
            subtitle: post.subtitle,
            img_url: post.img_url,
            body: post.body,
        },
        errors: Vec::new(),
    })
}

/// Pipe for rewriting a post, admin only
/// - url: `{domain}/edit-post{post_id}`
///
/// # HTTP request requirements
/// ## body
/// - url encoded form containing `title`, `subtitle`, `img_url` and `body`
///   fields
///
/// # Response
/// ## Ok
/// - redirect to `/post/{post_id}`; the original date is kept
/// - the form again, with inline messages, if validation fails or the new
///   title is taken
/// ## Error
/// - Forbidden
/// - Bad request (non numeric id)
/// - Not found
/// - Internal server error
#[post("/edit-post{post_id}")]
pub async fn edit_post(
    req: HttpRequest,
    session: Session,
    form: Form<PostForm>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    auth::require_admin(&session)?;
    let post_id = req.match_info().query("post_id").parse::<i32>()?;
    let form = form.into_inner();

    let mut conn = app_state.pool.get()?;
    let mut post = BlogPost::find_by_id(&mut conn, post_id)?;

    let mut errors = form.validate();
    if errors.is_empty() {
        match post.edit(
            &mut conn,
            form.title.trim(),
            form.subtitle.trim(),
            form.img_url.trim(),
            &form.body,
        ) {
            Ok(()) => return Ok(see_other(&format!("/post/{}", post.id))),
            Err(AppError::DuplicateTitle) => {
                errors.push(FieldError::new("title", DUPLICATE_TITLE_MESSAGE))
            }
            Err(other) => return Err(other),
        }
    }

    html(&MakePostTemplate {
        chrome: PageChrome::from_session(&session),
        heading: "Edit Post",
        action: format!("/edit-post{}", post_id),
        form,
        errors,
    })
}

/// Pipe for deleting a post and its comments, admin only
/// - url: `{domain}/delete/{post_id}`
///
/// # Response
/// ## Ok
/// - redirect to `/`
/// ## Error
/// - Forbidden
/// - Bad request (non numeric id)
/// - Not found
/// - Internal server error
#[get("/delete/{post_id}")]
pub async fn delete_post(
    req: HttpRequest,
    session: Session,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    // Guarded exactly like new-post and edit-post; an anonymous request
    // gets refused, not a crash.
    auth::require_admin(&session)?;
    let post_id = req.match_info().query("post_id").parse::<i32>()?;

    let mut conn = app_state.pool.get()?;
    BlogPost::find_by_id(&mut conn, post_id)?;
    BlogPost::delete_by_id(&mut conn, post_id)?;

    Ok(see_other("/"))
}
