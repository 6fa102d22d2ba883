use actix_session::Session;
use actix_web::{
    get, post,
    web::{Data, Form},
    HttpResponse,
};

use super::see_other;
use crate::{
    app::{AppError, AppState},
    auth::{self, password},
    database::models::user::*,
    forms::{LoginForm, RegisterForm},
    templates::{html, LoginTemplate, PageChrome, RegisterTemplate},
};

/// Pipe for showing the registration form
/// - url: `{domain}/register`
#[get("/register")]
pub async fn register_form(session: Session) -> Result<HttpResponse, AppError> {
    html(&RegisterTemplate {
        chrome: PageChrome::from_session(&session),
        form: RegisterForm::default(),
        errors: Vec::new(),
    })
}

/// Pipe for registering a new user
/// - url: `{domain}/register`
///
/// # HTTP request requirements
/// ## body
/// - url encoded form containing `name`, `email` and `password` fields
///
/// # Response
/// ## Ok
/// - redirect to `/` with the fresh user logged in
/// - redirect to `/login` with a flashed message if the email is taken
/// - the form again, with inline messages, if validation fails
/// ## Error
/// - Internal server error
#[post("/register")]
pub async fn register(
    session: Session,
    form: Form<RegisterForm>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();

    let errors = form.validate();
    if !errors.is_empty() {
        return html(&RegisterTemplate {
            chrome: PageChrome::from_session(&session),
            form,
            errors,
        });
    }

    let mut conn = app_state.pool.get()?;

    if User::find_by_email(&mut conn, form.email.trim()).is_some() {
        auth::flash(&session, "This email is already registered");
        return Ok(see_other("/login"));
    }

    let hash = password::hash_password(&form.password)?;
    let user = match User::new(&mut conn, form.email.trim(), &hash, form.name.trim()) {
        Ok(user) => user,
        // Lost a race against a concurrent registration for the same email.
        Err(AppError::DuplicateEmail) => {
            auth::flash(&session, "This email is already registered");
            return Ok(see_other("/login"));
        }
        Err(other) => return Err(other),
    };

    auth::login_session(&session, user.id)?;

    Ok(see_other("/"))
}

/// Pipe for showing the login form
/// - url: `{domain}/login`
#[get("/login")]
pub async fn login_form(session: Session) -> Result<HttpResponse, AppError> {
    html(&LoginTemplate {
        chrome: PageChrome::from_session(&session),
        form: LoginForm::default(),
    })
}

/// Pipe for logging in as user
/// - url: `{domain}/login`
///
/// # HTTP request requirements
/// ## body
/// - url encoded form containing `email` and `password` fields
///
/// # Response
/// ## Ok
/// - redirect to `/` with the session cookie holding the user's id
/// - the form again, with a flashed message, if the email is unknown or
///   the password does not match
/// ## Error
/// - Internal server error
#[post("/login")]
pub async fn login(
    session: Session,
    form: Form<LoginForm>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    let mut conn = app_state.pool.get()?;

    let user = match User::find_by_email(&mut conn, form.email.trim()) {
        Some(user) => user,
        None => {
            auth::flash(&session, "This email is not valid, please try again.");
            return html(&LoginTemplate {
                chrome: PageChrome::from_session(&session),
                form,
            });
        }
    };

    if !password::verify_password(&form.password, &user.password) {
        auth::flash(&session, "Wrong password, try again.");
        return html(&LoginTemplate {
            chrome: PageChrome::from_session(&session),
            form,
        });
    }

    auth::login_session(&session, user.id)?;

    Ok(see_other("/"))
}

/// Pipe for logging out
/// - url: `{domain}/logout`
///
/// # Response
/// ## Ok
/// - redirect to `/` with the session purged
#[get("/logout")]
pub async fn logout(session: Session) -> Result<HttpResponse, AppError> {
    auth::logout_session(&session);

    Ok(see_other("/"))
}

#[cfg(test)]
mod tests {
    use actix_web::cookie::Key;
    use actix_web::http::{header, StatusCode};
    use actix_web::test::{self, call_service};
    use actix_web::web::Data;
    use actix_web::App;
    use diesel::prelude::*;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::routes::test_helpers::session_cookie;
    use crate::schema::users;

    #[actix_rt::test]
    async fn test_register_logs_the_user_in() {
        let appstate = AppState::new(Some(":memory:"));
        let app = test::init_service(
            App::new()
                .app_data(Data::new(appstate.clone()))
                .wrap(auth::session_middleware(Key::generate()))
                .service(register),
        )
        .await;

        let resp = call_service(
            &app,
            test::TestRequest::post()
                .uri("/register")
                .set_form(&RegisterForm {
                    name: String::from("Ana"),
                    email: String::from("ana@example.com"),
                    password: String::from("hunter2-but-longer"),
                })
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap().to_str().unwrap(),
            "/"
        );
        assert!(session_cookie(&resp).is_some());

        let mut conn = appstate.pool.get().unwrap();
        let user = User::find_by_email(&mut conn, "ana@example.com").unwrap();
        assert_eq!(user.id, auth::ADMIN_USER_ID);
        assert_eq!(user.name, "Ana");
        // Stored as an argon2 hash, never the plaintext.
        assert_ne!(user.password, "hunter2-but-longer");
        assert!(user.password.starts_with("$argon2"));
    }

    #[actix_rt::test]
    async fn test_register_duplicate_email_bounces_to_login() {
        let appstate = AppState::new(Some(":memory:"));
        let app = test::init_service(
            App::new()
                .app_data(Data::new(appstate.clone()))
                .wrap(auth::session_middleware(Key::generate()))
                .service(register)
                .service(login_form),
        )
        .await;

        let payload = RegisterForm {
            name: String::from("Ana"),
            email: String::from("ana@example.com"),
            password: String::from("hunter2-but-longer"),
        };
        let resp = call_service(
            &app,
            test::TestRequest::post()
                .uri("/register")
                .set_form(&payload)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);

        let resp = call_service(
            &app,
            test::TestRequest::post()
                .uri("/register")
                .set_form(&payload)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap().to_str().unwrap(),
            "/login"
        );

        // Still exactly one row for that email.
        let mut conn = appstate.pool.get().unwrap();
        let count: i64 = users::table.count().get_result(&mut conn).unwrap();
        assert_eq!(count, 1);
        drop(conn);

        // Following the redirect shows the flashed message.
        let cookie = session_cookie(&resp).unwrap();
        let resp = call_service(
            &app,
            test::TestRequest::get()
                .uri("/login")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let body = test::read_body(resp).await;
        assert!(std::str::from_utf8(&body)
            .unwrap()
            .contains("This email is already registered"));
    }

    #[actix_rt::test]
    async fn test_register_rejects_missing_fields_inline() {
        let appstate = AppState::new(Some(":memory:"));
        let app = test::init_service(
            App::new()
                .app_data(Data::new(appstate.clone()))
                .wrap(auth::session_middleware(Key::generate()))
                .service(register),
        )
        .await;

        let resp = call_service(
            &app,
            test::TestRequest::post()
                .uri("/register")
                .set_form(&RegisterForm {
                    name: String::from(""),
                    email: String::from("ana@example.com"),
                    password: String::from("hunter2-but-longer"),
                })
                .to_request(),
        )
        .await;

        // No redirect, the form comes back annotated.
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert!(std::str::from_utf8(&body)
            .unwrap()
            .contains("This field is required."));

        let mut conn = appstate.pool.get().unwrap();
        let count: i64 = users::table.count().get_result(&mut conn).unwrap();
        assert_eq!(count, 0);
    }

    #[actix_rt::test]
    async fn test_login_wrong_password_flashes() {
        let appstate = AppState::new(Some(":memory:"));
        let app = test::init_service(
            App::new()
                .app_data(Data::new(appstate.clone()))
                .wrap(auth::session_middleware(Key::generate()))
                .service(login),
        )
        .await;

        {
            let mut conn = appstate.pool.get().unwrap();
            let hash = password::hash_password("right-password").unwrap();
            User::new(&mut conn, "ana@example.com", &hash, "Ana").unwrap();
        }

        let resp = call_service(
            &app,
            test::TestRequest::post()
                .uri("/login")
                .set_form(&LoginForm {
                    email: String::from("ana@example.com"),
                    password: String::from("wrong-password"),
                })
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert!(std::str::from_utf8(&body)
            .unwrap()
            .contains("Wrong password, try again."));
    }

    #[actix_rt::test]
    async fn test_login_unknown_email_flashes() {
        let appstate = AppState::new(Some(":memory:"));
        let app = test::init_service(
            App::new()
                .app_data(Data::new(appstate.clone()))
                .wrap(auth::session_middleware(Key::generate()))
                .service(login),
        )
        .await;

        let resp = call_service(
            &app,
            test::TestRequest::post()
                .uri("/login")
                .set_form(&LoginForm {
                    email: String::from("nobody@example.com"),
                    password: String::from("whatever"),
                })
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert!(std::str::from_utf8(&body)
            .unwrap()
            .contains("This email is not valid, please try again."));
    }

    #[actix_rt::test]
    async fn test_login_then_logout_round_trip() {
        let appstate = AppState::new(Some(":memory:"));
        let app = test::init_service(
            App::new()
                .app_data(Data::new(appstate.clone()))
                .wrap(auth::session_middleware(Key::generate()))
                .service(login)
                .service(logout),
        )
        .await;

        {
            let mut conn = appstate.pool.get().unwrap();
            let hash = password::hash_password("right-password").unwrap();
            User::new(&mut conn, "ana@example.com", &hash, "Ana").unwrap();
        }

        let resp = call_service(
            &app,
            test::TestRequest::post()
                .uri("/login")
                .set_form(&LoginForm {
                    email: String::from("ana@example.com"),
                    password: String::from("right-password"),
                })
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        let cookie = session_cookie(&resp).unwrap();
        assert!(!cookie.value().is_empty());

        let resp = call_service(
            &app,
            test::TestRequest::get()
                .uri("/logout")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        // Purging leaves a removal cookie behind.
        let cleared = session_cookie(&resp).unwrap();
        assert!(cleared.value().is_empty());
    }
}
