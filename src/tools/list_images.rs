use rmcp::{
    ErrorData as McpError,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars::JsonSchema,
};
use serde::Deserialize;

use crate::{
    alttext::{AltTextClient, ListImagesQuery, SortDirection, SortField},
    format::format_image_list,
    tools::{render, validation},
};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListImagesRequest {
    #[schemars(description = "Page number, starting at 1", range(min = 1))]
    pub page: Option<u32>,
    #[schemars(description = "Images per page (1-100, default 20)", range(min = 1, max = 100))]
    pub limit: Option<u32>,
    #[schemars(description = "Language code of the alt text to return", length(min = 2, max = 10))]
    pub lang: Option<String>,
    #[schemars(
        description = "Only return images with this source URL",
        length(min = 1, max = 2048)
    )]
    pub url: Option<String>,
    #[schemars(description = "Sort field")]
    pub sort: Option<SortField>,
    #[schemars(description = "Sort direction")]
    pub direction: Option<SortDirection>,
}

pub async fn list_images(
    client: &AltTextClient,
    Parameters(request): Parameters<ListImagesRequest>,
) -> Result<CallToolResult, McpError> {
    if let Some(page) = request.page {
        validation::check_range("page", page, 1, u32::MAX)?;
    }
    if let Some(limit) = request.limit {
        validation::check_range("limit", limit, 1, validation::MAX_PAGE_LIMIT)?;
    }
    validation::check_lang(request.lang.as_deref())?;
    if let Some(url) = request.url.as_deref() {
        validation::validate_http_url("url", url)?;
    }

    let query = ListImagesQuery {
        page: request.page,
        limit: request.limit,
        lang: request.lang,
        url: request.url,
        sort: request.sort,
        direction: request.direction,
    };
    Ok(render(
        "list_images",
        client.list_images(&query).await,
        format_image_list,
    ))
}
