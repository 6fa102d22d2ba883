pub mod password;

use std::env;

use actix_session::storage::CookieSessionStore;
use actix_session::{Session, SessionMiddleware};
use actix_web::cookie::Key;

use crate::app::AppError;

/// The first registered user owns the blog; there is no role column.
pub const ADMIN_USER_ID: i32 = 1;

const USER_ID_KEY: &str = "user_id";
const FLASH_KEY: &str = "flash";

/// Binds the session to the user, replacing whatever identity it carried.
pub fn login_session(session: &Session, user_id: i32) -> Result<(), AppError> {
    session.renew();
    session.insert(USER_ID_KEY, user_id)?;
    Ok(())
}

/// Drops the whole session state, identity and pending flash included.
pub fn logout_session(session: &Session) {
    session.purge();
}

/// The user id the session is bound to, if any.
pub fn current_user_id(session: &Session) -> Option<i32> {
    session.get::<i32>(USER_ID_KEY).ok().flatten()
}

pub fn is_admin(session: &Session) -> bool {
    current_user_id(session) == Some(ADMIN_USER_ID)
}

/// Admits only the admin. Fails closed: a request carrying no session user
/// at all is refused the same way a non-admin one is.
pub fn require_admin(session: &Session) -> Result<i32, AppError> {
    match current_user_id(session) {
        Some(user_id) if user_id == ADMIN_USER_ID => Ok(user_id),
        _ => Err(AppError::Forbidden),
    }
}

/// Stores a one-shot notice for the next rendered page.
pub fn flash(session: &Session, message: &str) {
    let _ = session.insert(FLASH_KEY, message);
}

/// Takes the pending flash message, leaving none behind.
pub fn take_flash(session: &Session) -> Option<String> {
    session.remove_as::<String>(FLASH_KEY).and_then(Result::ok)
}

/// Session signing key: derived from `SECRET_KEY` when configured,
/// generated fresh otherwise (sessions then end with the process).
pub fn session_key() -> Key {
    match env::var("SECRET_KEY") {
        Ok(secret) if secret.len() >= 32 => Key::derive_from(secret.as_bytes()),
        Ok(_) => panic!("SECRET_KEY must be at least 32 bytes"),
        Err(_) => Key::generate(),
    }
}

/// Cookie-backed session middleware, shared by the server and the tests.
pub fn session_middleware(secret_key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), secret_key)
        // The blog serves plain http; a Secure cookie would never come back.
        .cookie_secure(false)
        .build()
}
