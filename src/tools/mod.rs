pub mod bulk_create;
pub mod delete_image;
pub mod generate_alt_text;
pub mod get_account;
pub mod get_image;
pub mod list_images;
pub mod local_file;
pub mod scrape_page;
pub mod search_images;
pub mod translate_image;
pub mod update_account;
pub mod update_image;
pub mod validation;

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
    schemars::JsonSchema,
};
use serde::Deserialize;
use tracing::{error, warn};

use crate::alttext::{ApiError, GenerationOptions};
use crate::format::format_api_error;

pub use bulk_create::{BulkCreateRequest, bulk_create};
pub use delete_image::{DeleteImageRequest, delete_image};
pub use generate_alt_text::{
    GenerateAltTextFromFileRequest, GenerateAltTextRequest, generate_alt_text,
    generate_alt_text_from_file,
};
pub use get_account::get_account;
pub use get_image::{GetImageRequest, get_image};
pub use list_images::{ListImagesRequest, list_images};
pub use scrape_page::{ScrapePageRequest, scrape_page};
pub use search_images::{SearchImagesRequest, search_images};
pub use translate_image::{TranslateImageRequest, translate_image};
pub use update_account::{UpdateAccountRequest, update_account};
pub use update_image::{UpdateImageRequest, update_image};

// Generation settings shared by every tool that creates alt text.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct GenerationArgs {
    #[schemars(
        description = "Language code for the generated alt text, e.g. en, fr, pt-br",
        length(min = 2, max = 10)
    )]
    pub lang: Option<String>,
    #[schemars(description = "SEO keywords to work into the alt text (max 6)", length(max = 6))]
    pub keywords: Option<Vec<String>>,
    #[schemars(description = "Keywords the alt text must avoid (max 6)", length(max = 6))]
    pub negative_keywords: Option<Vec<String>>,
    #[schemars(
        description = "Custom prompt for the generator (max 1024 characters)",
        length(min = 1, max = 1024)
    )]
    pub gpt_prompt: Option<String>,
    #[schemars(
        description = "Maximum alt text length in characters (1-1000)",
        range(min = 1, max = 1000)
    )]
    pub max_chars: Option<u32>,
    #[schemars(description = "Replace existing alt text for this asset. false is sent explicitly")]
    pub overwrite: Option<bool>,
}

impl GenerationArgs {
    pub fn validate(&self) -> Result<(), McpError> {
        validation::check_lang(self.lang.as_deref())?;
        validation::check_count("keywords", self.keywords.as_deref(), validation::MAX_KEYWORDS)?;
        validation::check_count(
            "negative_keywords",
            self.negative_keywords.as_deref(),
            validation::MAX_KEYWORDS,
        )?;
        validation::check_optional_length(
            "gpt_prompt",
            self.gpt_prompt.as_deref(),
            1,
            validation::MAX_GPT_PROMPT_CHARS,
        )?;
        if let Some(max_chars) = self.max_chars {
            validation::check_range(
                "max_chars",
                max_chars,
                validation::MIN_MAX_CHARS,
                validation::MAX_MAX_CHARS,
            )?;
        }
        Ok(())
    }

    pub fn into_options(self) -> GenerationOptions {
        GenerationOptions {
            lang: self.lang,
            keywords: self.keywords,
            negative_keywords: self.negative_keywords,
            gpt_prompt: self.gpt_prompt,
            max_chars: self.max_chars,
            overwrite: self.overwrite,
        }
    }
}

pub(crate) fn text_result(text: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text)])
}

/// Upstream and connection failures become flagged tool results, not
/// protocol errors, so the agent can read and branch on them.
pub(crate) fn api_error_result(tool: &str, err: &ApiError) -> CallToolResult {
    error!(
        tool,
        status = err.status,
        code = err.error_code.as_deref().unwrap_or(""),
        "alttext call failed"
    );
    CallToolResult::error(vec![Content::text(format_api_error(err))])
}

pub(crate) fn local_error_result(tool: &str, message: impl std::fmt::Display) -> CallToolResult {
    warn!(tool, %message, "rejected before upload");
    CallToolResult::error(vec![Content::text(format!("Error: {message}"))])
}

pub(crate) fn render<T>(
    tool: &str,
    outcome: Result<T, ApiError>,
    format: impl FnOnce(&T) -> String,
) -> CallToolResult {
    match outcome {
        Ok(value) => text_result(format(&value)),
        Err(err) => api_error_result(tool, &err),
    }
}

pub(crate) fn check_tags(tags: Option<&[String]>) -> Result<(), McpError> {
    validation::check_count("tags", tags, validation::MAX_TAGS)
}
