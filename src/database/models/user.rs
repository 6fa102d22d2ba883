use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel::SqliteConnection;

use crate::app::AppError;
use crate::schema::users;

#[derive(Debug, Queryable, Clone)]
pub struct User {
    pub id: i32,
    pub email: String,
    ///Argon2 hash of the password
    pub password: String,
    pub name: String,
}

#[derive(Insertable)]
#[diesel(table_name = users)]
pub struct UserInsert {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl User {
    /// Pushes a new user row and returns it. `password_hash` must already
    /// be hashed; plaintext never reaches this layer. An email that is
    /// already registered comes back as [`AppError::DuplicateEmail`].
    ///
    /// # Example
    /// ```
    /// let result = User::new(
    ///     &mut conn,
    ///     "reader@example.com",
    ///     "argon2 hash of the password",
    ///     "Reader");
    /// ```
    pub fn new(
        conn: &mut SqliteConnection,
        email_in: &str,
        password_hash: &str,
        name_in: &str,
    ) -> Result<User, AppError> {
        let to_insert = UserInsert {
            email: email_in.to_string(),
            password: password_hash.to_string(),
            name: name_in.to_string(),
        };

        diesel::insert_into(users::table)
            .values(&to_insert)
            .get_result(conn)
            .map_err(|err| match err {
                diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    AppError::DuplicateEmail
                }
                other => other.into(),
            })
    }

    /** Returns the user with the id specified */
    pub fn find_by_id(conn: &mut SqliteConnection, user_id: i32) -> Result<User, AppError> {
        use crate::schema::users::dsl::*;

        users
            .filter(id.eq(user_id))
            .first::<User>(conn)
            .map_err(AppError::from)
    }

    /// Returns the first user found with the specified email. If no user
    /// matches, a `None` option will be returned.
    pub fn find_by_email(conn: &mut SqliteConnection, email_in: &str) -> Option<User> {
        use crate::schema::users::dsl::*;

        users.filter(email.eq(email_in)).first::<User>(conn).ok()
    }
}
