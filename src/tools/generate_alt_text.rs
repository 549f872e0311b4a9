use base64::Engine;
use indexmap::IndexMap;
use rmcp::{
    ErrorData as McpError,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars::JsonSchema,
};
use serde::Deserialize;
use tracing::debug;

use crate::{
    alttext::{AltTextClient, CreateImage, ImageSource},
    format::format_image,
    tools::{GenerationArgs, check_tags, local_error_result, local_file, render, validation},
};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GenerateAltTextRequest {
    #[schemars(description = "Public http(s) URL of the image", length(min = 1, max = 2048))]
    pub url: String,
    #[schemars(
        description = "Your own identifier for the image. Generated by AltText.ai when omitted",
        length(min = 1, max = 255)
    )]
    pub asset_id: Option<String>,
    #[schemars(description = "Tags stored with the image (max 50)", length(max = 50))]
    pub tags: Option<Vec<String>>,
    #[schemars(description = "String key/value metadata stored with the image")]
    pub metadata: Option<IndexMap<String, String>>,
    #[serde(flatten)]
    pub generation: GenerationArgs,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GenerateAltTextFromFileRequest {
    #[schemars(
        description = "Path to a local image (jpg, jpeg, png, gif, webp, bmp, tiff, tif, svg, avif; max 10 MiB)",
        length(min = 1)
    )]
    pub file_path: String,
    #[schemars(
        description = "Your own identifier for the image. Generated by AltText.ai when omitted",
        length(min = 1, max = 255)
    )]
    pub asset_id: Option<String>,
    #[schemars(description = "Tags stored with the image (max 50)", length(max = 50))]
    pub tags: Option<Vec<String>>,
    #[schemars(description = "String key/value metadata stored with the image")]
    pub metadata: Option<IndexMap<String, String>>,
    #[serde(flatten)]
    pub generation: GenerationArgs,
}

fn check_common(
    asset_id: Option<&str>,
    tags: Option<&[String]>,
    generation: &GenerationArgs,
) -> Result<(), McpError> {
    if let Some(asset_id) = asset_id {
        validation::check_asset_id(asset_id)?;
    }
    check_tags(tags)?;
    generation.validate()
}

pub async fn generate_alt_text(
    client: &AltTextClient,
    Parameters(request): Parameters<GenerateAltTextRequest>,
) -> Result<CallToolResult, McpError> {
    validation::validate_http_url("url", &request.url)?;
    check_common(
        request.asset_id.as_deref(),
        request.tags.as_deref(),
        &request.generation,
    )?;

    let create = CreateImage {
        source: ImageSource::Url(request.url.trim().to_string()),
        asset_id: request.asset_id,
        tags: request.tags,
        metadata: request.metadata,
        options: request.generation.into_options(),
    };
    Ok(render(
        "generate_alt_text",
        client.create_image(&create).await,
        format_image,
    ))
}

pub async fn generate_alt_text_from_file(
    client: &AltTextClient,
    Parameters(request): Parameters<GenerateAltTextFromFileRequest>,
) -> Result<CallToolResult, McpError> {
    const TOOL: &str = "generate_alt_text_from_file";
    check_common(
        request.asset_id.as_deref(),
        request.tags.as_deref(),
        &request.generation,
    )?;

    let file = match local_file::read_image_file(&request.file_path).await {
        Ok(file) => file,
        Err(err) => return Ok(local_error_result(TOOL, err)),
    };
    debug!(path = %file.path.display(), bytes = file.contents.len(), "uploading local image");
    let raw = base64::engine::general_purpose::STANDARD.encode(&file.contents);

    let create = CreateImage {
        source: ImageSource::Raw(raw),
        asset_id: request.asset_id,
        tags: request.tags,
        metadata: request.metadata,
        options: request.generation.into_options(),
    };
    Ok(render(TOOL, client.create_image(&create).await, format_image))
}
