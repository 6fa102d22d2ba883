pub mod comment;
pub mod pages;
pub mod post;
pub mod user;

use actix_web::http::header;
use actix_web::HttpResponse;

/// A 303 redirect; every handler that finishes a POST (or logout/delete)
/// points the browser somewhere with this.
pub fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}
