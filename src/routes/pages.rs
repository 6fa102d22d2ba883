use actix_session::Session;
use actix_web::{get, HttpResponse};

use crate::app::AppError;
use crate::templates::{html, AboutTemplate, ContactTemplate, PageChrome};

/// Pipe for the about page
/// - url: `{domain}/about`
#[get("/about")]
pub async fn about(session: Session) -> Result<HttpResponse, AppError> {
    html(&AboutTemplate {
        chrome: PageChrome::from_session(&session),
    })
}

/// Pipe for the contact page
/// - url: `{domain}/contact`
#[get("/contact")]
pub async fn contact(session: Session) -> Result<HttpResponse, AppError> {
    html(&ContactTemplate {
        chrome: PageChrome::from_session(&session),
    })
}
