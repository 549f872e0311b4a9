use indexmap::IndexMap;
use rmcp::schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::error::{FieldErrors, deserialize_field_errors};

// ---- responses ----

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ImageRecord {
    #[serde(default)]
    pub asset_id: String,
    pub alt_text: Option<String>,
    pub url: Option<String>,
    /// Language code -> translated alt text.
    pub alt_texts: Option<IndexMap<String, String>>,
    pub tags: Option<Vec<String>>,
    pub metadata: Option<IndexMap<String, String>>,
    /// Seconds since the Unix epoch.
    pub created_at: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_field_errors")]
    pub errors: Option<FieldErrors>,
    pub error_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Account {
    #[serde(default)]
    pub name: String,
    pub usage: Option<i64>,
    pub usage_limit: Option<i64>,
    pub default_lang: Option<String>,
    pub gpt_prompt: Option<String>,
    pub max_chars: Option<u32>,
    pub webhook_url: Option<String>,
    pub notification_email: Option<String>,
    pub whitelabel: Option<bool>,
    pub no_quotes: Option<bool>,
    pub ending_period: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ScrapedImage {
    pub src: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub skip_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ScrapeResult {
    pub scraped_images: Option<Vec<ScrapedImage>>,
    pub total_processed: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_field_errors")]
    pub errors: Option<FieldErrors>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BulkImportResult {
    pub success: Option<bool>,
    pub rows: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_field_errors")]
    pub errors: Option<FieldErrors>,
    pub error_code: Option<String>,
}

/// List and search bodies come either wrapped in `{"images": [...]}` or as a
/// bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ImageListBody {
    Wrapped { images: Vec<ImageRecord> },
    Bare(Vec<ImageRecord>),
}

impl ImageListBody {
    pub(crate) fn into_images(self) -> Vec<ImageRecord> {
        match self {
            Self::Wrapped { images } | Self::Bare(images) => images,
        }
    }
}

// ---- request shapes ----

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Generation settings shared by image creation and page scraping.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerationOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpt_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_chars: Option<u32>,
    /// `Some(false)` is sent; only `None` is omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overwrite: Option<bool>,
}

/// Where the image bytes come from. Serialized as a single `url` or `raw` key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    Url(String),
    /// Base64 encoded file contents.
    Raw(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateImage {
    pub source: ImageSource,
    pub asset_id: Option<String>,
    pub tags: Option<Vec<String>>,
    pub metadata: Option<IndexMap<String, String>>,
    pub options: GenerationOptions,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateImage {
    pub alt_text: Option<String>,
    pub tags: Option<Vec<String>>,
    pub metadata: Option<IndexMap<String, String>>,
    pub lang: Option<String>,
    pub overwrite: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateAccount {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_email: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScrapePage {
    pub url: String,
    pub html: Option<String>,
    pub include_existing: Option<bool>,
    pub options: GenerationOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListImagesQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<SortDirection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchImagesQuery {
    pub q: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

// ---- wire envelopes ----

#[derive(Serialize)]
pub(crate) struct CreateImageBody<'a> {
    pub image: NewImageBody<'a>,
    #[serde(rename = "async")]
    pub run_async: bool,
    #[serde(flatten)]
    pub options: &'a GenerationOptions,
}

#[derive(Serialize)]
pub(crate) struct NewImageBody<'a> {
    #[serde(flatten)]
    pub source: &'a ImageSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<&'a IndexMap<String, String>>,
}

impl<'a> CreateImageBody<'a> {
    pub(crate) fn new(request: &'a CreateImage) -> Self {
        Self {
            image: NewImageBody {
                source: &request.source,
                asset_id: request.asset_id.as_deref(),
                tags: request.tags.as_deref(),
                metadata: request.metadata.as_ref(),
            },
            run_async: false,
            options: &request.options,
        }
    }
}

#[derive(Serialize)]
pub(crate) struct TranslateImageBody<'a> {
    pub image: AssetRef<'a>,
    pub lang: &'a str,
    #[serde(rename = "async")]
    pub run_async: bool,
}

#[derive(Serialize)]
pub(crate) struct AssetRef<'a> {
    pub asset_id: &'a str,
}

#[derive(Serialize)]
pub(crate) struct UpdateImageBody<'a> {
    pub image: ImagePatch<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overwrite: Option<bool>,
}

#[derive(Serialize)]
pub(crate) struct ImagePatch<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<&'a IndexMap<String, String>>,
}

impl<'a> UpdateImageBody<'a> {
    pub(crate) fn new(request: &'a UpdateImage) -> Self {
        Self {
            image: ImagePatch {
                alt_text: request.alt_text.as_deref(),
                tags: request.tags.as_deref(),
                metadata: request.metadata.as_ref(),
            },
            lang: request.lang.as_deref(),
            overwrite: request.overwrite,
        }
    }
}

#[derive(Serialize)]
pub(crate) struct UpdateAccountBody<'a> {
    pub account: &'a UpdateAccount,
}

#[derive(Serialize)]
pub(crate) struct ScrapePageBody<'a> {
    pub page_scrape: PageRef<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_existing: Option<bool>,
    #[serde(flatten)]
    pub options: &'a GenerationOptions,
}

#[derive(Serialize)]
pub(crate) struct PageRef<'a> {
    pub url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<&'a str>,
}

impl<'a> ScrapePageBody<'a> {
    pub(crate) fn new(request: &'a ScrapePage) -> Self {
        Self {
            page_scrape: PageRef {
                url: &request.url,
                html: request.html.as_deref(),
            },
            include_existing: request.include_existing,
            options: &request.options,
        }
    }
}

#[derive(Serialize)]
pub(crate) struct LangQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<&'a str>,
}
