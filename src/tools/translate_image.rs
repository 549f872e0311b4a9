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
pub struct TranslateImageRequest {
    #[schemars(
        description = "Asset ID of an image that already has alt text",
        length(min = 1, max = 255)
    )]
    pub asset_id: String,
    #[schemars(description = "Target language code, e.g. fr, de, pt-br", length(min = 2, max = 10))]
    pub lang: String,
}

pub async fn translate_image(
    client: &AltTextClient,
    Parameters(request): Parameters<TranslateImageRequest>,
) -> Result<CallToolResult, McpError> {
    validation::check_asset_id(&request.asset_id)?;
    validation::check_lang(Some(request.lang.as_str()))?;
    Ok(render(
        "translate_image",
        client.translate_image(&request.asset_id, &request.lang).await,
        format_image,
    ))
}
