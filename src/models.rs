use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The authenticated user's identity, as returned by the backend and
/// persisted between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// Author summary embedded in blogs and comments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlogStatus {
    Draft,
    Published,
    Scheduled,
}

impl fmt::Display for BlogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlogStatus::Draft => write!(f, "draft"),
            BlogStatus::Published => write!(f, "published"),
            BlogStatus::Scheduled => write!(f, "scheduled"),
        }
    }
}

impl FromStr for BlogStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(BlogStatus::Draft),
            "published" => Ok(BlogStatus::Published),
            "scheduled" => Ok(BlogStatus::Scheduled),
            other => Err(format!(
                "unknown status '{}', expected draft, published or scheduled",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blog {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    pub status: BlogStatus,
    #[serde(default)]
    pub scheduled_at: Option<String>,
    pub author: Author,
    #[serde(default)]
    pub likes_count: i64,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub comments_count: i64,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Comments are the one entity the backend sends with a camelCase
/// timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub content: String,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
}

/// Pagination snapshot, recomputed on every list fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
}

impl Pagination {
    pub fn total_pages(&self) -> u32 {
        if self.limit == 0 {
            return 1;
        }
        let pages = (self.total as f64 / self.limit as f64).ceil() as u32;
        pages.max(1)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            total: 0,
        }
    }
}

/// Response body of `GET /blogs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogList {
    #[serde(default)]
    pub blogs: Vec<Blog>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
}

impl BlogList {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            limit: self.limit,
            total: self.total,
        }
    }
}

/// Response body of the login and register endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Self-registration always creates an ordinary user.
    pub role: Role,
}

/// Partial profile update for `PUT /users/me`. Absent fields are omitted
/// from the request body entirely.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.avatar.is_none()
    }
}

/// Create/update payload for a blog. `scheduled_at` is an absolute RFC 3339
/// timestamp when the blog is scheduled, and an explicit null otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogPayload {
    pub title: String,
    pub description: String,
    pub content: String,
    pub tags: Vec<String>,
    pub cover_image: String,
    pub status: BlogStatus,
    pub scheduled_at: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Analytics {
    pub total_blogs: u64,
    pub total_likes: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentRequest {
    pub content: String,
}
