use indexmap::IndexMap;
use rmcp::{
    ErrorData as McpError,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars::JsonSchema,
};
use serde::Deserialize;

use crate::{
    alttext::{AltTextClient, UpdateImage},
    format::format_image,
    tools::{check_tags, render, validation},
};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateImageRequest {
    #[schemars(description = "Asset ID of the image to update", length(min = 1, max = 255))]
    pub asset_id: String,
    #[schemars(description = "Replacement alt text (max 1000 characters)", length(max = 1000))]
    pub alt_text: Option<String>,
    #[schemars(description = "Replacement tags (max 50)", length(max = 50))]
    pub tags: Option<Vec<String>>,
    #[schemars(description = "Replacement string key/value metadata")]
    pub metadata: Option<IndexMap<String, String>>,
    #[schemars(description = "Language code the alt text is written in", length(min = 2, max = 10))]
    pub lang: Option<String>,
    #[schemars(description = "Replace existing values. false is sent explicitly")]
    pub overwrite: Option<bool>,
}

pub async fn update_image(
    client: &AltTextClient,
    Parameters(request): Parameters<UpdateImageRequest>,
) -> Result<CallToolResult, McpError> {
    validation::check_asset_id(&request.asset_id)?;
    validation::check_optional_length(
        "alt_text",
        request.alt_text.as_deref(),
        0,
        validation::MAX_ALT_TEXT_CHARS,
    )?;
    check_tags(request.tags.as_deref())?;
    validation::check_lang(request.lang.as_deref())?;

    let update = UpdateImage {
        alt_text: request.alt_text,
        tags: request.tags,
        metadata: request.metadata,
        lang: request.lang,
        overwrite: request.overwrite,
    };
    Ok(render(
        "update_image",
        client.update_image(&request.asset_id, &update).await,
        format_image,
    ))
}
