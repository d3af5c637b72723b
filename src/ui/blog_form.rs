use chrono::{NaiveDateTime, TimeZone, Utc};

use crate::error::{ApiError, ApiResult};
use crate::models::{Blog, BlogPayload, BlogStatus};

pub const MAX_TAGS: usize = 5;
pub const MIN_TAGS: usize = 2;

const DEFAULT_COVER_IMAGE: &str =
    "https://images.unsplash.com/photo-1517694712202-14dd9538aa97?w=800";

/// Form state for creating or editing a blog. Tag additions are refused
/// once the ceiling is reached; everything else is checked at submit time,
/// first failure wins.
#[derive(Debug, Clone, PartialEq)]
pub struct BlogForm {
    pub title: String,
    pub description: String,
    pub content: String,
    pub tags: Vec<String>,
    pub cover_image: String,
    pub status: BlogStatus,
    /// Local wall-clock date-time chosen for a scheduled publication.
    pub scheduled_at: Option<NaiveDateTime>,
}

impl Default for BlogForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            content: String::new(),
            tags: Vec::new(),
            cover_image: DEFAULT_COVER_IMAGE.to_string(),
            status: BlogStatus::Published,
            scheduled_at: None,
        }
    }
}

impl BlogForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefill from an existing blog for the edit screen.
    pub fn from_blog(blog: &Blog) -> Self {
        Self {
            title: blog.title.clone(),
            description: blog.description.clone(),
            content: blog.content.clone(),
            tags: blog.tags.clone(),
            cover_image: blog.cover_image.clone().unwrap_or_default(),
            status: blog.status,
            scheduled_at: None,
        }
    }

    pub fn can_add_tag(&self) -> bool {
        self.tags.len() < MAX_TAGS
    }

    /// Add a trimmed tag. Blank input and additions past the ceiling are
    /// refused.
    pub fn add_tag(&mut self, raw: &str) -> bool {
        let tag = raw.trim();
        if tag.is_empty() || !self.can_add_tag() {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    pub fn remove_tag(&mut self, index: usize) {
        if index < self.tags.len() {
            self.tags.remove(index);
        }
    }

    /// Submit-time validation, checked in order; the first failure wins.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() || self.content.trim().is_empty() {
            return Err("Title and content are required".to_string());
        }
        if self.tags.len() < MIN_TAGS {
            return Err(format!("Please add at least {} tags", MIN_TAGS));
        }
        if self.status == BlogStatus::Scheduled && self.scheduled_at.is_none() {
            return Err("Please select a schedule date and time".to_string());
        }
        Ok(())
    }

    /// Validate and build the request payload, resolving the chosen local
    /// date-time against `tz` into an absolute RFC 3339 timestamp.
    /// `scheduled_at` is an explicit null for non-scheduled statuses.
    pub fn payload_in<Tz: TimeZone>(&self, tz: &Tz) -> ApiResult<BlogPayload> {
        self.validate().map_err(ApiError::Validation)?;

        let scheduled_at = match (self.status, self.scheduled_at) {
            (BlogStatus::Scheduled, Some(local)) => {
                let resolved = tz
                    .from_local_datetime(&local)
                    .earliest()
                    .ok_or_else(|| {
                        ApiError::Validation("Please select a schedule date and time".to_string())
                    })?;
                Some(resolved.with_timezone(&Utc).to_rfc3339())
            }
            _ => None,
        };

        Ok(BlogPayload {
            title: self.title.clone(),
            description: self.description.clone(),
            content: self.content.clone(),
            tags: self.tags.clone(),
            cover_image: self.cover_image.clone(),
            status: self.status,
            scheduled_at,
        })
    }

    /// Payload in the system's local timezone.
    pub fn payload(&self) -> ApiResult<BlogPayload> {
        self.payload_in(&chrono::Local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn valid_form() -> BlogForm {
        let mut form = BlogForm::new();
        form.title = "CSS Grid in anger".into();
        form.content = "# Layout\nSome markdown".into();
        form.add_tag("CSS");
        form.add_tag("Layout");
        form
    }

    #[test]
    fn title_and_content_checked_first() {
        let mut form = BlogForm::new();
        form.add_tag("one");
        assert_eq!(
            form.validate().unwrap_err(),
            "Title and content are required"
        );

        form.title = "t".into();
        assert_eq!(
            form.validate().unwrap_err(),
            "Title and content are required"
        );
    }

    #[test]
    fn whitespace_title_is_rejected() {
        let mut form = valid_form();
        form.title = "   ".into();
        assert_eq!(
            form.validate().unwrap_err(),
            "Title and content are required"
        );
    }

    #[test]
    fn fewer_than_two_tags_is_rejected() {
        let mut form = BlogForm::new();
        form.title = "t".into();
        form.content = "c".into();
        form.add_tag("solo");
        assert_eq!(form.validate().unwrap_err(), "Please add at least 2 tags");
    }

    #[test]
    fn scheduled_without_date_is_rejected() {
        let mut form = valid_form();
        form.status = BlogStatus::Scheduled;
        assert_eq!(
            form.validate().unwrap_err(),
            "Please select a schedule date and time"
        );
    }

    #[test]
    fn valid_form_passes() {
        assert!(valid_form().validate().is_ok());
    }

    #[test]
    fn tag_ceiling_refuses_sixth_tag() {
        let mut form = BlogForm::new();
        for tag in ["a", "b", "c", "d", "e"] {
            assert!(form.add_tag(tag));
        }
        assert!(!form.can_add_tag());
        assert!(!form.add_tag("f"));
        assert_eq!(form.tags.len(), 5);
    }

    #[test]
    fn tags_are_trimmed_and_blank_tags_refused() {
        let mut form = BlogForm::new();
        assert!(form.add_tag("  CSS  "));
        assert_eq!(form.tags, vec!["CSS"]);
        assert!(!form.add_tag("   "));
        assert_eq!(form.tags.len(), 1);
    }

    #[test]
    fn remove_tag_out_of_range_is_a_no_op() {
        let mut form = BlogForm::new();
        form.add_tag("a");
        form.remove_tag(5);
        assert_eq!(form.tags, vec!["a"]);
        form.remove_tag(0);
        assert!(form.tags.is_empty());
    }

    #[test]
    fn scheduled_payload_converts_local_time_to_utc() {
        let mut form = valid_form();
        form.status = BlogStatus::Scheduled;
        form.scheduled_at = Some(
            NaiveDateTime::parse_from_str("2026-09-01T18:30:00", "%Y-%m-%dT%H:%M:%S").unwrap(),
        );

        // UTC+2: 18:30 local is 16:30 absolute.
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let payload = form.payload_in(&tz).unwrap();
        assert_eq!(
            payload.scheduled_at.as_deref(),
            Some("2026-09-01T16:30:00+00:00")
        );
    }

    #[test]
    fn published_payload_has_null_schedule() {
        let form = valid_form();
        let tz = FixedOffset::east_opt(0).unwrap();
        let payload = form.payload_in(&tz).unwrap();
        assert_eq!(payload.scheduled_at, None);
        assert_eq!(payload.status, BlogStatus::Published);
    }

    #[test]
    fn scheduled_without_date_blocks_payload() {
        let mut form = valid_form();
        form.status = BlogStatus::Scheduled;
        let tz = FixedOffset::east_opt(0).unwrap();
        assert!(matches!(
            form.payload_in(&tz),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn from_blog_prefills_fields() {
        use crate::models::Author;
        let blog = Blog {
            id: 3,
            title: "t".into(),
            description: "d".into(),
            content: "c".into(),
            tags: vec!["a".into(), "b".into()],
            cover_image: Some("http://img".into()),
            status: BlogStatus::Draft,
            scheduled_at: None,
            author: Author {
                id: 1,
                username: "john".into(),
                avatar: None,
            },
            likes_count: 0,
            is_liked: false,
            comments_count: 0,
            comments: vec![],
            created_at: String::new(),
            updated_at: String::new(),
        };
        let form = BlogForm::from_blog(&blog);
        assert_eq!(form.title, "t");
        assert_eq!(form.tags.len(), 2);
        assert_eq!(form.cover_image, "http://img");
        assert_eq!(form.status, BlogStatus::Draft);
    }
}
