use actix_session::Session;
use actix_web::{
    post,
    web::{Data, Form},
    HttpRequest, HttpResponse,
};

use super::see_other;
use crate::{
    app::{AppError, AppState},
    auth,
    database::models::{comment::*, post::*},
    forms::CommentForm,
    templates::{html, PageChrome, PostTemplate},
};

/// Pipe for commenting on a post
/// - url: `{domain}/post/{post_id}`
///
/// # HTTP request requirements
/// ## body
/// - url encoded form containing a `comment` field
///
/// # Response
/// ## Ok
/// - the post page again with the new comment appended
/// - the post page again, with an inline message, when the comment is
///   blank
/// - redirect to `/login` with a flashed message when nobody is logged in
/// ## Error
/// - Bad request (non numeric id)
/// - Not found
/// - Internal server error
#[post("/post/{post_id}")]
pub async fn add_comment(
    req: HttpRequest,
    session: Session,
    form: Form<CommentForm>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let post_id = req.match_info().query("post_id").parse::<i32>()?;
    let mut conn = app_state.pool.get()?;

    // Unknown posts 404 here the same way the read page does.
    let (post, author) = BlogPost::find_with_author(&mut conn, post_id)?;

    let user_id = match auth::current_user_id(&session) {
        Some(user_id) => user_id,
        None => {
            auth::flash(&session, "You are not logged in");
            return Ok(see_other("/login"));
        }
    };

    let form = form.into_inner();
    let errors = form.validate();
    if errors.is_empty() {
        Comment::new(&mut conn, post_id, user_id, &form.comment)?;
    }

    let comments = Comment::find_by_post(&mut conn, post_id)?;

    html(&PostTemplate {
        chrome: PageChrome::from_session(&session),
        post,
        author,
        comments,
        errors,
    })
}
