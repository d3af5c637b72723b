use crate::api::blogs;
use crate::client::ApiClient;
use crate::models::Blog;

/// Like state for a single blog, modeled as an explicit three-step
/// transition: a toggle is applied optimistically, then either confirmed or
/// reverted when the backend answers. The pre-toggle values ride along in
/// `Pending` so rollback is exact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeState {
    pub likes: i64,
    pub is_liked: bool,
    phase: Phase,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Idle,
    Pending { prev_likes: i64, prev_liked: bool },
}

/// Which backend call the optimistic toggle now requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeAction {
    Like,
    Unlike,
}

/// Result of driving a full toggle against the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Confirmed,
    Reverted,
    /// No session; the view navigates to login instead of calling.
    RedirectLogin,
    /// A previous toggle is still in flight; the activation is dropped.
    Ignored,
}

impl LikeState {
    pub fn new(likes: i64, is_liked: bool) -> Self {
        Self {
            likes,
            is_liked,
            phase: Phase::Idle,
        }
    }

    pub fn from_blog(blog: &Blog) -> Self {
        Self::new(blog.likes_count, blog.is_liked)
    }

    /// Apply the toggle optimistically. Returns the call to make, or `None`
    /// while a previous toggle is still in flight (the control is
    /// disabled).
    pub fn begin_toggle(&mut self) -> Option<LikeAction> {
        if matches!(self.phase, Phase::Pending { .. }) {
            return None;
        }
        self.phase = Phase::Pending {
            prev_likes: self.likes,
            prev_liked: self.is_liked,
        };
        self.is_liked = !self.is_liked;
        self.likes += if self.is_liked { 1 } else { -1 };
        Some(if self.is_liked {
            LikeAction::Like
        } else {
            LikeAction::Unlike
        })
    }

    /// The backend accepted the toggle; the optimistic values stand.
    pub fn confirm(&mut self) {
        self.phase = Phase::Idle;
    }

    /// The backend rejected the toggle; both the flag and the count return
    /// to their pre-toggle values.
    pub fn revert(&mut self) {
        if let Phase::Pending {
            prev_likes,
            prev_liked,
        } = self.phase
        {
            self.likes = prev_likes;
            self.is_liked = prev_liked;
        }
        self.phase = Phase::Idle;
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase, Phase::Pending { .. })
    }
}

/// Drive one complete toggle: optimistic apply, backend call, then confirm
/// or revert. An unauthenticated actor is redirected to login without any
/// call or state change.
pub async fn toggle(state: &mut LikeState, client: &ApiClient, blog_id: u64) -> ToggleOutcome {
    if !client.store().is_authenticated() {
        return ToggleOutcome::RedirectLogin;
    }

    let Some(action) = state.begin_toggle() else {
        return ToggleOutcome::Ignored;
    };

    let result = match action {
        LikeAction::Like => blogs::like_blog(client, blog_id).await,
        LikeAction::Unlike => blogs::unlike_blog(client, blog_id).await,
    };

    match result {
        Ok(()) => {
            state.confirm();
            ToggleOutcome::Confirmed
        }
        Err(e) => {
            tracing::error!("failed to update like: {}", e);
            state.revert();
            ToggleOutcome::Reverted
        }
    }
}
