pub mod schema;
pub mod database;
pub mod app;

mod auth;
mod forms;
mod routes;
mod templates;

use actix_web::{middleware::Logger, web::Data, App, HttpServer};
use app::AppState;
use routes::{comment::*, pages::*, post::*, user::*};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let app_state = AppState::new(None);
    let session_key = auth::session_key();

    log::info!("Server running on 127.0.0.1:8080");
    HttpServer::new(move || {
        App::new()
            .app_data(Data::new(app_state.clone()))
            .wrap(Logger::default())
            .wrap(auth::session_middleware(session_key.clone()))
            //Post routes
            .service(get_all_posts)
            .service(show_post)
            .service(new_post_form)
            .service(create_post)
            .service(edit_post_form)
            .service(edit_post)
            .service(delete_post)
            //User routes
            .service(register_form)
            .service(register)
            .service(login_form)
            .service(login)
            .service(logout)
            //Comment routes
            .service(add_comment)
            //Static pages
            .service(about)
            .service(contact)
    })
    .bind(("127.0.0.1", 8080))?
    .run()
    .await
}
