use rmcp::{
    ErrorData as McpError,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars::JsonSchema,
};
use serde::Deserialize;

use crate::{
    alttext::{AltTextClient, ScrapePage},
    format::format_scrape_result,
    tools::{GenerationArgs, render, validation},
};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ScrapePageRequest {
    #[schemars(
        description = "Public http(s) URL of the page to scan for images",
        length(min = 1, max = 2048)
    )]
    pub url: String,
    #[schemars(
        description = "Page HTML to scan instead of fetching the URL (max 5 MiB)",
        length(max = 5242880)
    )]
    pub html: Option<String>,
    #[schemars(description = "Also process images that already have alt text. false is sent explicitly")]
    pub include_existing: Option<bool>,
    #[serde(flatten)]
    pub generation: GenerationArgs,
}

pub async fn scrape_page(
    client: &AltTextClient,
    Parameters(request): Parameters<ScrapePageRequest>,
) -> Result<CallToolResult, McpError> {
    validation::validate_http_url("url", &request.url)?;
    if let Some(html) = request.html.as_deref() {
        if html.len() > validation::MAX_HTML_BYTES {
            return Err(McpError::invalid_params(
                format!("html must be at most {} bytes", validation::MAX_HTML_BYTES),
                None,
            ));
        }
    }
    request.generation.validate()?;

    let scrape = ScrapePage {
        url: request.url.trim().to_string(),
        html: request.html,
        include_existing: request.include_existing,
        options: request.generation.into_options(),
    };
    Ok(render(
        "scrape_page",
        client.scrape_page(&scrape).await,
        format_scrape_result,
    ))
}
