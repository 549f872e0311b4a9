//! Plain-text rendering of AltText.ai records for the calling agent.
//!
//! Labels and line order are stable; agents may parse them.

use chrono::{DateTime, SecondsFormat};

use crate::alttext::{
    Account, ApiError, BulkImportResult, FieldErrors, ImageRecord, Page, Pagination,
    ScrapeResult, error::flatten_field_errors,
};

const ASYNC_NOTE: &str =
    "Note: Alt text is generated asynchronously. Use list_images or get_image to check results.";

pub fn format_image(image: &ImageRecord) -> String {
    let mut lines = vec![
        format!("Asset ID: {}", image.asset_id),
        format!("Alt text: {}", image.alt_text.as_deref().unwrap_or("(none)")),
    ];
    if let Some(url) = &image.url {
        lines.push(format!("URL: {url}"));
    }
    if let Some(languages) = image.alt_texts.as_ref().filter(|map| !map.is_empty()) {
        lines.push("Languages:".to_string());
        lines.extend(
            languages
                .iter()
                .map(|(lang, text)| format!("  {lang}: {text}")),
        );
    }
    if let Some(tags) = image.tags.as_ref().filter(|tags| !tags.is_empty()) {
        lines.push(format!("Tags: {}", tags.join(", ")));
    }
    if let Some(metadata) = image.metadata.as_ref().filter(|map| !map.is_empty()) {
        if let Ok(json) = serde_json::to_string(metadata) {
            lines.push(format!("Metadata: {json}"));
        }
    }
    if let Some(created) = image.created_at.and_then(format_timestamp) {
        lines.push(format!("Created: {created}"));
    }
    push_errors(&mut lines, image.errors.as_ref());
    if let Some(code) = &image.error_code {
        lines.push(format!("Error code: {code}"));
    }
    lines.join("\n")
}

/// Epoch seconds to `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn format_timestamp(epoch_seconds: f64) -> Option<String> {
    if !epoch_seconds.is_finite() {
        return None;
    }
    let millis = (epoch_seconds * 1000.0).round() as i64;
    DateTime::from_timestamp_millis(millis).map(|instant| instant.to_rfc3339_opts(SecondsFormat::Millis, true))
}

pub fn format_image_list(page: &Page<ImageRecord>) -> String {
    render_listing(page_header(&page.pagination), &page.items)
}

pub fn format_search_results(query: &str, page: &Page<ImageRecord>) -> String {
    let header = format!(
        "Search results for \"{query}\": {}",
        page_header(&page.pagination)
    );
    render_listing(header, &page.items)
}

fn page_header(pagination: &Pagination) -> String {
    format!(
        "Page {} of {} ({} total images, {} per page)",
        pagination.current_page, pagination.total_pages, pagination.total_count, pagination.page_items
    )
}

fn render_listing(header: String, images: &[ImageRecord]) -> String {
    if images.is_empty() {
        return format!("No images found.\n{header}");
    }
    let mut lines = vec![header, String::new()];
    for image in images {
        lines.push(format!(
            "- {}: {}",
            image.asset_id,
            image.alt_text.as_deref().unwrap_or("(no alt text)")
        ));
        if let Some(url) = &image.url {
            lines.push(format!("  URL: {url}"));
        }
    }
    lines.join("\n")
}

pub fn format_account(account: &Account) -> String {
    let mut lines = vec![format!("Name: {}", account.name)];
    if let (Some(usage), Some(limit)) = (account.usage, account.usage_limit) {
        lines.push(format!(
            "Credits: {} remaining ({usage} used of {limit})",
            limit - usage
        ));
    }
    if let Some(lang) = &account.default_lang {
        lines.push(format!("Default language: {lang}"));
    }
    if let Some(prompt) = &account.gpt_prompt {
        lines.push(format!("Custom prompt: {prompt}"));
    }
    if let Some(max_chars) = account.max_chars {
        lines.push(format!("Max characters: {max_chars}"));
    }
    if let Some(webhook) = &account.webhook_url {
        lines.push(format!("Webhook URL: {webhook}"));
    }
    if let Some(email) = &account.notification_email {
        lines.push(format!("Notification email: {email}"));
    }
    for (label, flag) in [
        ("Whitelabel", account.whitelabel),
        ("No quotes", account.no_quotes),
        ("Ending period", account.ending_period),
    ] {
        if let Some(flag) = flag {
            lines.push(format!("{label}: {}", if flag { "yes" } else { "no" }));
        }
    }
    lines.join("\n")
}

pub fn format_scrape_result(result: &ScrapeResult) -> String {
    let images = result.scraped_images.as_deref().unwrap_or_default();
    let queued = result.total_processed.unwrap_or(0);
    let mut lines = vec![format!(
        "Found {} image(s) on page, {queued} queued for alt text generation.",
        images.len()
    )];
    for image in images {
        let mut line = format!("- {}", image.src.as_deref().unwrap_or("(unknown source)"));
        if let (Some(width), Some(height)) = (image.width, image.height) {
            line.push_str(&format!(" {width}x{height}"));
        }
        match &image.skip_reason {
            Some(reason) => line.push_str(&format!(" [skipped: {reason}]")),
            None => line.push_str(" [queued]"),
        }
        lines.push(line);
    }
    push_errors(&mut lines, result.errors.as_ref());
    if queued > 0 {
        lines.push(String::new());
        lines.push(ASYNC_NOTE.to_string());
    }
    lines.join("\n")
}

pub fn format_bulk_import(result: &BulkImportResult, email: Option<&str>) -> String {
    let mut lines = vec!["Bulk import submitted.".to_string()];
    if let Some(rows) = result.rows {
        lines.push(format!("Rows: {rows}"));
    }
    if let Some(email) = email {
        lines.push(format!("Results will be emailed to {email}."));
    }
    push_errors(&mut lines, result.errors.as_ref());
    if let Some(code) = &result.error_code {
        lines.push(format!("Error code: {code}"));
    }
    lines.join("\n")
}

pub fn format_deleted(asset_id: &str) -> String {
    format!("Deleted image {asset_id}.")
}

pub fn format_api_error(err: &ApiError) -> String {
    match &err.error_code {
        Some(code) => format!("Error ({}): {}\nCode: {code}", err.status, err.message),
        None => format!("Error ({}): {}", err.status, err.message),
    }
}

fn push_errors(lines: &mut Vec<String>, errors: Option<&FieldErrors>) {
    if let Some(errors) = errors {
        let joined = flatten_field_errors(errors);
        if !joined.is_empty() {
            lines.push(format!("Errors: {joined}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;
    use crate::alttext::ScrapedImage;

    fn sample_image() -> ImageRecord {
        let mut alt_texts = IndexMap::new();
        alt_texts.insert("fr".to_string(), "Un chat".to_string());
        alt_texts.insert("de".to_string(), "Eine Katze".to_string());
        let mut metadata = IndexMap::new();
        metadata.insert("sku".to_string(), "123".to_string());
        ImageRecord {
            asset_id: "cat-1".to_string(),
            alt_text: Some("A cat".to_string()),
            url: Some("https://example.com/cat.jpg".to_string()),
            alt_texts: Some(alt_texts),
            tags: Some(vec!["pets".to_string(), "cats".to_string()]),
            metadata: Some(metadata),
            created_at: Some(1_700_000_000.0),
            errors: None,
            error_code: None,
        }
    }

    #[test]
    fn full_image_record() {
        let text = format_image(&sample_image());
        assert_eq!(
            text,
            "Asset ID: cat-1\n\
             Alt text: A cat\n\
             URL: https://example.com/cat.jpg\n\
             Languages:\n  fr: Un chat\n  de: Eine Katze\n\
             Tags: pets, cats\n\
             Metadata: {\"sku\":\"123\"}\n\
             Created: 2023-11-14T22:13:20.000Z"
        );
    }

    #[test]
    fn missing_alt_text_renders_none() {
        let image = ImageRecord {
            asset_id: "x".to_string(),
            ..Default::default()
        };
        let text = format_image(&image);
        assert!(text.contains("Alt text: (none)"));
        assert!(!text.contains("Languages:"));
        assert!(!text.contains("Metadata:"));
        assert!(!text.contains("Created:"));
    }

    #[test]
    fn empty_maps_are_omitted() {
        let image = ImageRecord {
            asset_id: "x".to_string(),
            alt_texts: Some(IndexMap::new()),
            metadata: Some(IndexMap::new()),
            tags: Some(Vec::new()),
            ..Default::default()
        };
        assert_eq!(format_image(&image), "Asset ID: x\nAlt text: (none)");
    }

    #[test]
    fn record_errors_flatten_and_code_has_own_line() {
        let mut errors = FieldErrors::new();
        errors.insert("url".to_string(), vec!["is invalid".to_string()]);
        errors.insert("lang".to_string(), vec!["is unsupported".to_string()]);
        let image = ImageRecord {
            asset_id: "x".to_string(),
            errors: Some(errors),
            error_code: Some("invalid_image".to_string()),
            ..Default::default()
        };
        let text = format_image(&image);
        assert!(text.contains("\nErrors: is invalid, is unsupported\nError code: invalid_image"));
    }

    #[test]
    fn formatting_is_deterministic() {
        let image = sample_image();
        assert_eq!(format_image(&image), format_image(&image));
    }

    #[test]
    fn millisecond_precision_timestamps() {
        assert_eq!(
            format_timestamp(1_700_000_000.5).as_deref(),
            Some("2023-11-14T22:13:20.500Z")
        );
        assert_eq!(format_timestamp(f64::NAN), None);
    }

    #[test]
    fn credits_line() {
        let account = Account {
            name: "Acme".to_string(),
            usage: Some(42),
            usage_limit: Some(1000),
            ..Default::default()
        };
        let text = format_account(&account);
        assert!(text.contains("Credits: 958 remaining (42 used of 1000)"));
    }

    #[test]
    fn credits_are_not_clamped() {
        let account = Account {
            name: "Acme".to_string(),
            usage: Some(120),
            usage_limit: Some(100),
            ..Default::default()
        };
        assert!(format_account(&account).contains("Credits: -20 remaining (120 used of 100)"));
    }

    #[test]
    fn account_flags_render_yes_no() {
        let account = Account {
            name: "Acme".to_string(),
            default_lang: Some("en".to_string()),
            whitelabel: Some(true),
            no_quotes: Some(false),
            ..Default::default()
        };
        assert_eq!(
            format_account(&account),
            "Name: Acme\nDefault language: en\nWhitelabel: yes\nNo quotes: no"
        );
    }

    #[test]
    fn image_list_rendering() {
        let page = Page {
            items: vec![
                ImageRecord {
                    asset_id: "a".to_string(),
                    alt_text: Some("First".to_string()),
                    url: Some("https://example.com/a.png".to_string()),
                    ..Default::default()
                },
                ImageRecord {
                    asset_id: "b".to_string(),
                    ..Default::default()
                },
            ],
            pagination: Pagination {
                current_page: 2,
                page_items: 2,
                total_pages: 5,
                total_count: 9,
            },
        };
        assert_eq!(
            format_image_list(&page),
            "Page 2 of 5 (9 total images, 2 per page)\n\n\
             - a: First\n  URL: https://example.com/a.png\n\
             - b: (no alt text)"
        );
    }

    #[test]
    fn empty_search_results() {
        let page = Page {
            items: Vec::new(),
            pagination: Pagination::default(),
        };
        assert_eq!(
            format_search_results("dog", &page),
            "No images found.\nSearch results for \"dog\": Page 1 of 1 (0 total images, 20 per page)"
        );
    }

    #[test]
    fn scrape_with_queued_images_adds_note() {
        let result = ScrapeResult {
            scraped_images: Some(vec![
                ScrapedImage {
                    src: Some("https://example.com/a.png".to_string()),
                    width: Some(640),
                    height: Some(480),
                    skip_reason: None,
                },
                ScrapedImage {
                    src: None,
                    width: None,
                    height: None,
                    skip_reason: Some("already has alt text".to_string()),
                },
            ]),
            total_processed: Some(1),
            errors: None,
        };
        assert_eq!(
            format_scrape_result(&result),
            format!(
                "Found 2 image(s) on page, 1 queued for alt text generation.\n\
                 - https://example.com/a.png 640x480 [queued]\n\
                 - (unknown source) [skipped: already has alt text]\n\n{ASYNC_NOTE}"
            )
        );
    }

    #[test]
    fn scrape_without_queued_images_has_no_note() {
        let result = ScrapeResult {
            scraped_images: Some(Vec::new()),
            total_processed: Some(0),
            errors: None,
        };
        let text = format_scrape_result(&result);
        assert!(!text.contains("Note:"));
    }

    #[test]
    fn api_error_with_and_without_code() {
        let err = ApiError::from_response(
            401,
            &serde_json::json!({"error": "Invalid API key", "error_code": "unauthorized"}),
        );
        assert_eq!(format_api_error(&err), "Error (401): Invalid API key\nCode: unauthorized");
        let err = ApiError::from_response(502, &serde_json::json!({}));
        assert_eq!(format_api_error(&err), "Error (502): HTTP 502");
    }

    #[test]
    fn bulk_import_summary() {
        let result = BulkImportResult {
            success: Some(true),
            rows: Some(12),
            errors: None,
            error_code: None,
        };
        assert_eq!(
            format_bulk_import(&result, Some("ops@example.com")),
            "Bulk import submitted.\nRows: 12\nResults will be emailed to ops@example.com."
        );
    }
}
