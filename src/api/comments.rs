use crate::client::{decode_json, expect_success, ApiClient};
use crate::error::ApiResult;
use crate::models::{Comment, CommentRequest};

pub async fn create_comment(client: &ApiClient, blog_id: u64, content: &str) -> ApiResult<Comment> {
    let body = CommentRequest {
        content: content.to_string(),
    };
    let resp = client
        .post_json(&format!("/blogs/{}/comments", blog_id), &body)
        .await
        .map_err(|e| e.with_default("Failed to create comment"))?;
    decode_json(resp, "Failed to create comment").await
}

pub async fn delete_comment(client: &ApiClient, comment_id: u64) -> ApiResult<()> {
    let resp = client
        .delete(&format!("/comments/{}", comment_id))
        .await
        .map_err(|e| e.with_default("Failed to delete comment"))?;
    expect_success(resp, "Failed to delete comment").await
}
