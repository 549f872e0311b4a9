use rmcp::{
    ErrorData as McpError,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars::JsonSchema,
};
use serde::Deserialize;

use crate::{
    alttext::AltTextClient,
    format::format_deleted,
    tools::{render, validation},
};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeleteImageRequest {
    #[schemars(description = "Asset ID of the image to delete", length(min = 1, max = 255))]
    pub asset_id: String,
}

pub async fn delete_image(
    client: &AltTextClient,
    Parameters(request): Parameters<DeleteImageRequest>,
) -> Result<CallToolResult, McpError> {
    validation::check_asset_id(&request.asset_id)?;
    let outcome = client.delete_image(&request.asset_id).await;
    Ok(render("delete_image", outcome, |_| format_deleted(&request.asset_id)))
}
