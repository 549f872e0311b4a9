use std::fmt::Display;

use rmcp::ErrorData as McpError;
use serde_json::Value;
use url::Url;

pub const MAX_ASSET_ID_CHARS: usize = 255;
pub const MIN_LANG_CHARS: usize = 2;
pub const MAX_LANG_CHARS: usize = 10;
pub const MAX_GPT_PROMPT_CHARS: usize = 1024;
pub const MAX_ALT_TEXT_CHARS: usize = 1000;
pub const MAX_NAME_CHARS: usize = 255;
pub const MAX_QUERY_CHARS: usize = 500;
pub const MAX_URL_CHARS: usize = 2048;
pub const MAX_HTML_BYTES: usize = 5 * 1024 * 1024;
pub const MIN_MAX_CHARS: u32 = 1;
pub const MAX_MAX_CHARS: u32 = 1000;
pub const MAX_KEYWORDS: usize = 6;
pub const MAX_TAGS: usize = 50;
pub const MAX_PAGE_LIMIT: u32 = 100;

pub fn validate_http_url(field: &str, raw: &str) -> Result<Url, McpError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(McpError::invalid_params(format!("{field} must not be empty"), None));
    }
    check_length(field, trimmed, 1, MAX_URL_CHARS)?;
    let parsed = Url::parse(trimmed).map_err(|err| {
        McpError::invalid_params(
            format!("{field} is not a valid URL"),
            Some(Value::String(err.to_string())),
        )
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(McpError::invalid_params(
            format!("{field} must use http or https"),
            Some(Value::String(format!("got scheme: {scheme}"))),
        )),
    }
}

/// Length in characters, inclusive bounds.
pub fn check_length(field: &str, value: &str, min: usize, max: usize) -> Result<(), McpError> {
    let length = value.chars().count();
    if length < min || length > max {
        return Err(McpError::invalid_params(
            format!("{field} must be between {min} and {max} characters (got {length})"),
            None,
        ));
    }
    Ok(())
}

pub fn check_optional_length(
    field: &str,
    value: Option<&str>,
    min: usize,
    max: usize,
) -> Result<(), McpError> {
    value.map_or(Ok(()), |value| check_length(field, value, min, max))
}

pub fn check_range<T>(field: &str, value: T, min: T, max: T) -> Result<(), McpError>
where
    T: PartialOrd + Display,
{
    if value < min || value > max {
        return Err(McpError::invalid_params(
            format!("{field} must be between {min} and {max} (got {value})"),
            None,
        ));
    }
    Ok(())
}

pub fn check_count(field: &str, items: Option<&[String]>, max: usize) -> Result<(), McpError> {
    match items {
        Some(items) if items.len() > max => Err(McpError::invalid_params(
            format!("{field} accepts at most {max} entries (got {})", items.len()),
            None,
        )),
        _ => Ok(()),
    }
}

pub fn check_asset_id(asset_id: &str) -> Result<(), McpError> {
    if asset_id.trim().is_empty() {
        return Err(McpError::invalid_params("asset_id must not be empty", None));
    }
    check_length("asset_id", asset_id, 1, MAX_ASSET_ID_CHARS)
}

pub fn check_lang(lang: Option<&str>) -> Result<(), McpError> {
    check_optional_length("lang", lang, MIN_LANG_CHARS, MAX_LANG_CHARS)
}
