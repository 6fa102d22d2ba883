use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::SqliteConnection;
use dotenv::dotenv;
use std::env;

use crate::app::DbPool;

/// Everything the application persists. Re-running these statements is a
/// no-op, which stands in for a migrations system.
const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS blog_posts (
    id INTEGER PRIMARY KEY,
    author_id INTEGER NOT NULL REFERENCES users (id),
    title TEXT NOT NULL UNIQUE,
    subtitle TEXT NOT NULL,
    date TEXT NOT NULL,
    body TEXT NOT NULL,
    img_url TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS comments (
    id INTEGER PRIMARY KEY,
    text TEXT NOT NULL,
    commentator_id INTEGER NOT NULL REFERENCES users (id),
    post_id INTEGER NOT NULL REFERENCES blog_posts (id)
);
";

#[derive(Debug)]
struct ConnectionSetup;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionSetup {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        // Foreign keys are off by default in sqlite; busy_timeout makes
        // concurrent writers queue instead of erroring.
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 1000;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Opens the connection pool and creates the schema if it is absent.
/// Reads `DATABASE_URL` from the environment (default `blog.db`) unless a
/// url is supplied.
///
/// # Example
/// ```
/// let pool = init_pool(Some(":memory:"));
/// ```
pub fn init_pool(database_url: Option<&str>) -> DbPool {
    dotenv().ok();

    let database_url = match database_url {
        Some(url) => url.to_string(),
        None => env::var("DATABASE_URL").unwrap_or_else(|_| String::from("blog.db")),
    };

    // An in-memory sqlite database exists per connection, so the pool must
    // never open a second one.
    let max_size = if database_url.contains(":memory:") { 1 } else { 10 };

    let manager = ConnectionManager::<SqliteConnection>::new(&database_url);
    let pool = Pool::builder()
        .max_size(max_size)
        .connection_customizer(Box::new(ConnectionSetup))
        .build(manager)
        .unwrap_or_else(|err| panic!("Error connecting to {}: {}", database_url, err));

    let mut conn = pool
        .get()
        .expect("No connection available to create the schema");
    conn.batch_execute(SCHEMA_SQL)
        .expect("Error creating the database schema");

    pool
}
