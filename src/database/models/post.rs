use chrono::Local;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel::SqliteConnection;

use super::user::User;
use crate::app::AppError;
use crate::schema::blog_posts;

#[derive(Debug, Queryable, Clone, PartialEq, Eq)]
pub struct BlogPost {
    pub id: i32,
    pub author_id: i32,
    pub title: String,
    pub subtitle: String,
    ///Publication date as shown to readers, e.g. "June 01, 2024"
    pub date: String,
    pub body: String,
    pub img_url: String,
}

#[derive(Insertable)]
#[diesel(table_name = blog_posts)]
struct PostInsert {
    pub author_id: i32,
    pub title: String,
    pub subtitle: String,
    pub date: String,
    pub body: String,
    pub img_url: String,
}

impl BlogPost {
    /// Inserts a new post by `author`, stamping the publication date with
    /// the current day in the blog's display format. A title another post
    /// already uses comes back as [`AppError::DuplicateTitle`].
    pub fn new(
        conn: &mut SqliteConnection,
        author: &User,
        title_in: &str,
        subtitle_in: &str,
        img_url_in: &str,
        body_in: &str,
    ) -> Result<BlogPost, AppError> {
        let to_insert = PostInsert {
            author_id: author.id,
            title: title_in.to_string(),
            subtitle: subtitle_in.to_string(),
            date: Local::now().format("%B %d, %Y").to_string(),
            body: body_in.to_string(),
            img_url: img_url_in.to_string(),
        };

        diesel::insert_into(blog_posts::table)
            .values(&to_insert)
            .get_result(conn)
            .map_err(Self::title_collision)
    }

    /// Every post in insertion order, paired with its author's name.
    pub fn all(conn: &mut SqliteConnection) -> Result<Vec<(BlogPost, String)>, AppError> {
        use crate::schema::users;

        blog_posts::table
            .inner_join(users::table)
            .order(blog_posts::id.asc())
            .select((blog_posts::all_columns, users::name))
            .load::<(BlogPost, String)>(conn)
            .map_err(AppError::from)
    }

    /** Returns the post with the id specified */
    pub fn find_by_id(conn: &mut SqliteConnection, post_id_in: i32) -> Result<BlogPost, AppError> {
        use crate::schema::blog_posts::dsl::*;

        blog_posts
            .filter(id.eq(post_id_in))
            .first::<BlogPost>(conn)
            .map_err(AppError::from)
    }

    /** Returns the post with the id specified together with its author's name */
    pub fn find_with_author(
        conn: &mut SqliteConnection,
        post_id_in: i32,
    ) -> Result<(BlogPost, String), AppError> {
        use crate::schema::users;

        blog_posts::table
            .inner_join(users::table)
            .filter(blog_posts::id.eq(post_id_in))
            .select((blog_posts::all_columns, users::name))
            .first::<(BlogPost, String)>(conn)
            .map_err(AppError::from)
    }

    /// Rewrites the editable fields. The author and the publication date
    /// are fixed at creation and stay untouched.
    pub fn edit(
        &mut self,
        conn: &mut SqliteConnection,
        title_in: &str,
        subtitle_in: &str,
        img_url_in: &str,
        body_in: &str,
    ) -> Result<(), AppError> {
        use crate::schema::blog_posts::dsl::*;

        diesel::update(blog_posts.filter(id.eq(self.id)))
            .set((
                title.eq(title_in),
                subtitle.eq(subtitle_in),
                img_url.eq(img_url_in),
                body.eq(body_in),
            ))
            .execute(conn)
            .map_err(Self::title_collision)?;

        self.title = title_in.to_string();
        self.subtitle = subtitle_in.to_string();
        self.img_url = img_url_in.to_string();
        self.body = body_in.to_string();

        Ok(())
    }

    /// Removes the post and every comment referencing it. Runs in one
    /// transaction so a failure leaves both tables untouched.
    pub fn delete_by_id(conn: &mut SqliteConnection, post_id_in: i32) -> Result<(), AppError> {
        use crate::schema::comments;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            diesel::delete(comments::table.filter(comments::post_id.eq(post_id_in)))
                .execute(conn)?;
            diesel::delete(blog_posts::table.filter(blog_posts::id.eq(post_id_in)))
                .execute(conn)?;
            Ok(())
        })?;

        Ok(())
    }

    fn title_collision(err: diesel::result::Error) -> AppError {
        match err {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                AppError::DuplicateTitle
            }
            other => other.into(),
        }
    }
}
