use std::time::Duration;

use anyhow::{Context, Result};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::{
    Client, Method, RequestBuilder, StatusCode,
    header::{self, HeaderMap, HeaderValue},
    multipart::{Form, Part},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::{
    error::ApiError,
    pagination::{Page, Pagination},
    retry::{is_connection_dropped, retry_dropped_connection},
    types::{
        Account, AssetRef, BulkImportResult, CreateImage, CreateImageBody, ImageListBody,
        ImageRecord, LangQuery, ListImagesQuery, ScrapePage, ScrapePageBody, ScrapeResult,
        SearchImagesQuery, TranslateImageBody, UpdateAccount, UpdateAccountBody, UpdateImage,
        UpdateImageBody,
    },
};

pub const DEFAULT_BASE_URL: &str = "https://alttext.ai/api/v1";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const API_KEY_HEADER: &str = "x-api-key";

/// Same set `encodeURIComponent` leaves alone.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Client for the AltText.ai REST API.
///
/// Configuration is fixed at construction; clones share the underlying
/// connection pool and are safe to use from concurrent tool calls.
#[derive(Debug, Clone)]
pub struct AltTextClient {
    base_url: String,
    http: Client,
    timeout: Duration,
}

struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

impl AltTextClient {
    pub fn new(api_key: &str, base_url: Option<&str>, client_tag: Option<&str>) -> Result<Self> {
        Self::with_timeout(api_key, base_url, client_tag, REQUEST_TIMEOUT)
    }

    /// Same as [`AltTextClient::new`] with a custom per-request timeout.
    pub fn with_timeout(
        api_key: &str,
        base_url: Option<&str>,
        client_tag: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        let mut api_key_value =
            HeaderValue::from_str(api_key).context("API key is not a valid header value")?;
        api_key_value.set_sensitive(true);
        default_headers.insert(API_KEY_HEADER, api_key_value);
        default_headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let user_agent = match client_tag.map(str::trim).filter(|tag| !tag.is_empty()) {
            Some(tag) => format!("{}/{} ({tag})", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            None => format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        };

        let http = Client::builder()
            .default_headers(default_headers)
            .user_agent(user_agent)
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .context("build http client")?;

        let base_url = base_url
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            base_url,
            http,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get_account(&self) -> Result<Account, ApiError> {
        let raw = self.send(|| self.request(Method::GET, "/account")).await?;
        decode(raw)
    }

    pub async fn update_account(&self, update: &UpdateAccount) -> Result<Account, ApiError> {
        let body = UpdateAccountBody { account: update };
        let raw = self
            .send(|| self.request(Method::PATCH, "/account").json(&body))
            .await?;
        decode(raw)
    }

    pub async fn list_images(&self, query: &ListImagesQuery) -> Result<Page<ImageRecord>, ApiError> {
        let raw = self
            .send(|| self.request(Method::GET, "/images").query(query))
            .await?;
        decode_page(raw)
    }

    pub async fn search_images(
        &self,
        query: &SearchImagesQuery,
    ) -> Result<Page<ImageRecord>, ApiError> {
        let raw = self
            .send(|| self.request(Method::GET, "/images/search").query(query))
            .await?;
        decode_page(raw)
    }

    pub async fn get_image(&self, asset_id: &str, lang: Option<&str>) -> Result<ImageRecord, ApiError> {
        let path = image_path(asset_id);
        let query = LangQuery { lang };
        let raw = self
            .send(|| self.request(Method::GET, &path).query(&query))
            .await?;
        decode(raw)
    }

    /// Generate alt text for a new image. Always synchronous (`async: false`).
    pub async fn create_image(&self, request: &CreateImage) -> Result<ImageRecord, ApiError> {
        let body = CreateImageBody::new(request);
        let raw = self
            .send(|| self.request(Method::POST, "/images").json(&body))
            .await?;
        decode(raw)
    }

    /// Translate the alt text of an existing asset into `lang`.
    pub async fn translate_image(&self, asset_id: &str, lang: &str) -> Result<ImageRecord, ApiError> {
        let body = TranslateImageBody {
            image: AssetRef { asset_id },
            lang,
            run_async: false,
        };
        let raw = self
            .send(|| self.request(Method::POST, "/images").json(&body))
            .await?;
        decode(raw)
    }

    pub async fn update_image(
        &self,
        asset_id: &str,
        request: &UpdateImage,
    ) -> Result<ImageRecord, ApiError> {
        let path = image_path(asset_id);
        let body = UpdateImageBody::new(request);
        let raw = self
            .send(|| self.request(Method::PATCH, &path).json(&body))
            .await?;
        decode(raw)
    }

    pub async fn delete_image(&self, asset_id: &str) -> Result<Value, ApiError> {
        let path = image_path(asset_id);
        let raw = self.send(|| self.request(Method::DELETE, &path)).await?;
        decode(raw)
    }

    /// Upload a CSV of images for background processing.
    pub async fn bulk_create(
        &self,
        file_name: &str,
        contents: &[u8],
        email: Option<&str>,
    ) -> Result<BulkImportResult, ApiError> {
        let raw = self
            .send(|| {
                let file = Part::bytes(contents.to_vec()).file_name(file_name.to_string());
                let mut form = Form::new().part("file", file);
                if let Some(email) = email {
                    form = form.text("email", email.to_string());
                }
                self.request(Method::POST, "/images/bulk_create").multipart(form)
            })
            .await?;
        decode(raw)
    }

    /// Queue alt text generation for the images found on a page.
    pub async fn scrape_page(&self, request: &ScrapePage) -> Result<ScrapeResult, ApiError> {
        let body = ScrapePageBody::new(request);
        let raw = self
            .send(|| self.request(Method::POST, "/images/page_scrape").json(&body))
            .await?;
        decode(raw)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "building request");
        self.http.request(method, url)
    }

    /// One round trip, plus a single retry when the connection was dropped.
    /// `build` runs once per attempt so multipart bodies can be rebuilt.
    async fn send<F>(&self, build: F) -> Result<RawResponse, ApiError>
    where
        F: Fn() -> RequestBuilder,
    {
        retry_dropped_connection(
            || {
                let request = build();
                async move {
                    let response = request.send().await?;
                    let status = response.status();
                    let headers = response.headers().clone();
                    let body = response.text().await?;
                    Ok::<_, reqwest::Error>(RawResponse {
                        status,
                        headers,
                        body,
                    })
                }
            },
            is_connection_dropped,
        )
        .await
        .map_err(|err| {
            debug!(error = %err, "transport failure");
            ApiError::connection(describe_transport_error(&err, self.timeout))
        })
    }
}

fn image_path(asset_id: &str) -> String {
    format!("/images/{}", utf8_percent_encode(asset_id, PATH_SEGMENT))
}

fn describe_transport_error(err: &reqwest::Error, timeout: Duration) -> String {
    if err.is_timeout() {
        format!("request timed out after {timeout:?}")
    } else if err.is_connect() {
        format!("connection failed ({err})")
    } else {
        err.to_string()
    }
}

fn parse_body(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|_| Value::Object(Default::default()))
}

fn classify(raw: &RawResponse) -> Result<Value, ApiError> {
    let body = parse_body(&raw.body);
    if raw.status.is_success() {
        Ok(body)
    } else {
        let err = ApiError::from_response(raw.status.as_u16(), &body);
        debug!(status = err.status, code = ?err.error_code, "upstream returned an error");
        Err(err)
    }
}

fn decode<T: DeserializeOwned>(raw: RawResponse) -> Result<T, ApiError> {
    let body = classify(&raw)?;
    serde_json::from_value(body).map_err(|err| ApiError::invalid_response(raw.status.as_u16(), err))
}

fn decode_page(raw: RawResponse) -> Result<Page<ImageRecord>, ApiError> {
    let pagination = Pagination::from_headers(&raw.headers);
    let body: ImageListBody = decode(raw)?;
    Ok(Page {
        items: body.into_images(),
        pagination,
    })
}
