use rmcp::{
    ErrorData as McpError,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars::JsonSchema,
};
use serde::Deserialize;

use crate::{
    alttext::{AltTextClient, SearchImagesQuery},
    format::format_search_results,
    tools::{render, validation},
};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchImagesRequest {
    #[schemars(
        description = "Text to search for in alt text, tags and asset IDs",
        length(min = 1, max = 500)
    )]
    pub query: String,
    #[schemars(description = "Maximum number of results (1-100)", range(min = 1, max = 100))]
    pub limit: Option<u32>,
    #[schemars(description = "Language code of the alt text to search", length(min = 2, max = 10))]
    pub lang: Option<String>,
}

pub async fn search_images(
    client: &AltTextClient,
    Parameters(request): Parameters<SearchImagesRequest>,
) -> Result<CallToolResult, McpError> {
    let query_text = request.query.trim().to_string();
    validation::check_length("query", &query_text, 1, validation::MAX_QUERY_CHARS)?;
    if let Some(limit) = request.limit {
        validation::check_range("limit", limit, 1, validation::MAX_PAGE_LIMIT)?;
    }
    validation::check_lang(request.lang.as_deref())?;

    let query = SearchImagesQuery {
        q: query_text,
        limit: request.limit,
        lang: request.lang,
    };
    let outcome = client.search_images(&query).await;
    Ok(render("search_images", outcome, |page| {
        format_search_results(&query.q, page)
    }))
}
