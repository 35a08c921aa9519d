// handlers/protected/comments - /projects/:project_id/comments

pub mod comment_post;

pub use comment_post::comment_post;
