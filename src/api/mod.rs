pub mod admin;
pub mod auth;
pub mod blogs;
pub mod comments;

pub use auth::AuthContext;
pub use blogs::ListQuery;
