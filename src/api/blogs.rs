use crate::client::{decode_json, expect_success, ApiClient};
use crate::error::ApiResult;
use crate::models::{Blog, BlogList, BlogPayload};

/// Query for the blog listing. Page and limit are always sent; search and
/// tag are omitted when absent or empty, never sent blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub tag: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            search: None,
            tag: None,
        }
    }
}

impl ListQuery {
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            params.push(("search", search.to_string()));
        }
        if let Some(tag) = self.tag.as_deref().filter(|t| !t.is_empty()) {
            params.push(("tag", tag.to_string()));
        }
        params
    }
}

pub async fn list_blogs(client: &ApiClient, query: &ListQuery) -> ApiResult<BlogList> {
    let resp = client
        .get("/blogs", &query.params())
        .await
        .map_err(|e| e.with_default("Failed to fetch blogs"))?;
    decode_json(resp, "Failed to fetch blogs").await
}

pub async fn fetch_blog(client: &ApiClient, id: u64) -> ApiResult<Blog> {
    let resp = client
        .get(&format!("/blogs/{}", id), &[])
        .await
        .map_err(|e| e.with_default("Failed to fetch blog"))?;
    decode_json(resp, "Failed to fetch blog").await
}

pub async fn create_blog(client: &ApiClient, payload: &BlogPayload) -> ApiResult<Blog> {
    let resp = client
        .post_json("/blogs", payload)
        .await
        .map_err(|e| e.with_default("Failed to create blog"))?;
    decode_json(resp, "Failed to create blog").await
}

pub async fn update_blog(client: &ApiClient, id: u64, payload: &BlogPayload) -> ApiResult<Blog> {
    let resp = client
        .put_json(&format!("/blogs/{}", id), payload)
        .await
        .map_err(|e| e.with_default("Failed to update blog"))?;
    decode_json(resp, "Failed to update blog").await
}

pub async fn delete_blog(client: &ApiClient, id: u64) -> ApiResult<()> {
    let resp = client
        .delete(&format!("/blogs/{}", id))
        .await
        .map_err(|e| e.with_default("Failed to delete blog"))?;
    expect_success(resp, "Failed to delete blog").await
}

pub async fn like_blog(client: &ApiClient, id: u64) -> ApiResult<()> {
    let resp = client
        .post_empty(&format!("/blogs/{}/like", id))
        .await
        .map_err(|e| e.with_default("Failed to like blog"))?;
    expect_success(resp, "Failed to like blog").await
}

pub async fn unlike_blog(client: &ApiClient, id: u64) -> ApiResult<()> {
    let resp = client
        .delete(&format!("/blogs/{}/like", id))
        .await
        .map_err(|e| e.with_default("Failed to unlike blog"))?;
    expect_success(resp, "Failed to unlike blog").await
}
