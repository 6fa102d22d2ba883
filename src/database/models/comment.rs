use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::app::AppError;
use crate::schema::comments;

#[derive(Debug, Queryable, Clone)]
pub struct Comment {
    pub id: i32,
    pub text: String,
    pub commentator_id: i32,
    pub post_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = comments)]
struct CommentInsert {
    pub text: String,
    pub commentator_id: i32,
    pub post_id: i32,
}

impl Comment {
    /** Creates a comment by the user specified on the post specified */
    pub fn new(
        conn: &mut SqliteConnection,
        post_id_in: i32,
        commentator_id_in: i32,
        text_in: &str,
    ) -> Result<Comment, AppError> {
        let record = CommentInsert {
            text: text_in.to_string(),
            commentator_id: commentator_id_in,
            post_id: post_id_in,
        };

        diesel::insert_into(comments::table)
            .values(&record)
            .get_result(conn)
            .map_err(AppError::from)
    }

    /// Every comment on a post in submission order, paired with the
    /// commentator's display name.
    pub fn find_by_post(
        conn: &mut SqliteConnection,
        post_id_in: i32,
    ) -> Result<Vec<(Comment, String)>, AppError> {
        use crate::schema::users;

        comments::table
            .inner_join(users::table)
            .filter(comments::post_id.eq(post_id_in))
            .order(comments::id.asc())
            .select((comments::all_columns, users::name))
            .load::<(Comment, String)>(conn)
            .map_err(AppError::from)
    }
}
