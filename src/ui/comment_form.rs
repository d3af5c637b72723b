use crate::api::comments;
use crate::client::ApiClient;
use crate::models::{Comment, User};

/// Draft state for the comment box. Empty or whitespace-only content never
/// reaches the backend, and the submit control stays disabled while a
/// submission is in flight.
#[derive(Debug, Clone, Default)]
pub struct CommentComposer {
    pub draft: String,
    submitting: bool,
}

impl CommentComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn can_submit(&self) -> bool {
        !self.draft.trim().is_empty() && !self.submitting
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }
}

/// The comment list attached to a blog detail view, with its displayed
/// count kept in step.
#[derive(Debug, Clone, Default)]
pub struct CommentThread {
    pub comments: Vec<Comment>,
    pub count: i64,
}

impl CommentThread {
    pub fn new(comments: Vec<Comment>, count: i64) -> Self {
        Self { comments, count }
    }

    /// New comments go to the top.
    pub fn prepend(&mut self, comment: Comment) {
        self.comments.insert(0, comment);
        self.count += 1;
    }

    pub fn remove(&mut self, comment_id: u64) -> bool {
        let before = self.comments.len();
        self.comments.retain(|c| c.id != comment_id);
        if self.comments.len() < before {
            self.count -= 1;
            true
        } else {
            false
        }
    }

    /// Only the comment's author may delete it.
    pub fn can_delete(user: Option<&User>, comment: &Comment) -> bool {
        match (user, comment.author.as_ref()) {
            (Some(user), Some(author)) => user.id == author.id,
            _ => false,
        }
    }
}

/// Submit the draft. On success the new comment is prepended, the count
/// bumped and the draft cleared; on failure state is left unchanged and the
/// error only logged. Returns whether the comment was posted.
pub async fn submit(
    composer: &mut CommentComposer,
    thread: &mut CommentThread,
    client: &ApiClient,
    blog_id: u64,
) -> bool {
    if !composer.can_submit() {
        return false;
    }

    composer.submitting = true;
    let result = comments::create_comment(client, blog_id, composer.draft.trim()).await;
    composer.submitting = false;

    match result {
        Ok(comment) => {
            thread.prepend(comment);
            composer.draft.clear();
            true
        }
        Err(e) => {
            tracing::error!("failed to add comment: {}", e);
            false
        }
    }
}

/// Delete a comment from the thread. Failure is logged and leaves the
/// thread untouched.
pub async fn delete(thread: &mut CommentThread, client: &ApiClient, comment_id: u64) -> bool {
    match comments::delete_comment(client, comment_id).await {
        Ok(()) => thread.remove(comment_id),
        Err(e) => {
            tracing::error!("failed to delete comment: {}", e);
            false
        }
    }
}
