use crate::client::{decode_json, failure_message, ApiClient};
use crate::error::{ApiError, ApiResult};
use crate::models::{Analytics, Blog, BlogList};

/// Page size large enough to pull the whole corpus for the dashboard table.
const ADMIN_LIST_LIMIT: u32 = 1000;

pub async fn fetch_all_blogs(client: &ApiClient) -> ApiResult<Vec<Blog>> {
    let resp = client
        .get("/blogs", &[("limit", ADMIN_LIST_LIMIT.to_string())])
        .await
        .map_err(|e| e.with_default("Failed to fetch blogs"))?;
    let list: BlogList = decode_json(resp, "Failed to fetch blogs").await?;
    Ok(list.blogs)
}

pub async fn fetch_analytics(client: &ApiClient) -> ApiResult<Analytics> {
    let resp = client
        .get("/admin/analytics", &[])
        .await
        .map_err(|e| e.with_default("Failed to fetch analytics"))?;
    decode_json(resp, "Failed to fetch analytics").await
}

/// Download the CSV export as raw bytes. The caller decides where to save
/// it (the shell defaults to `blogs_export.csv`).
pub async fn export_csv(client: &ApiClient) -> ApiResult<Vec<u8>> {
    let resp = client
        .get("/admin/export/csv", &[])
        .await
        .map_err(|e| e.with_default("Failed to export CSV"))?;

    if !resp.status().is_success() {
        return Err(ApiError::Api(
            failure_message(resp, &["message"], "Failed to export CSV").await,
        ));
    }

    let bytes = resp
        .bytes()
        .await
        .map_err(|_| ApiError::Api("Failed to export CSV".to_string()))?;
    Ok(bytes.to_vec())
}
