use rmcp::{
    ErrorData as McpError,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars::JsonSchema,
};
use serde::Deserialize;

use crate::{
    alttext::AltTextClient,
    format::format_image,
    tools::{render, validation},
};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetImageRequest {
    #[schemars(description = "Asset ID of the image", length(min = 1, max = 255))]
    pub asset_id: String,
    #[schemars(description = "Language code of the alt text to return", length(min = 2, max = 10))]
    pub lang: Option<String>,
}

pub async fn get_image(
    client: &AltTextClient,
    Parameters(request): Parameters<GetImageRequest>,
) -> Result<CallToolResult, McpError> {
    validation::check_asset_id(&request.asset_id)?;
    validation::check_lang(request.lang.as_deref())?;
    Ok(render(
        "get_image",
        client
            .get_image(&request.asset_id, request.lang.as_deref())
            .await,
        format_image,
    ))
}
