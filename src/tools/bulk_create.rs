use rmcp::{
    ErrorData as McpError,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars::JsonSchema,
};
use serde::Deserialize;
use tracing::debug;

use crate::{
    alttext::AltTextClient,
    format::format_bulk_import,
    tools::{local_error_result, local_file, render, validation},
};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct BulkCreateRequest {
    #[schemars(
        description = "Path to a local CSV file listing the images to import (max 10 MiB)",
        length(min = 1)
    )]
    pub file_path: String,
    #[schemars(
        description = "Email address that receives the import report",
        length(min = 3, max = 255)
    )]
    pub email: Option<String>,
}

pub async fn bulk_create(
    client: &AltTextClient,
    Parameters(request): Parameters<BulkCreateRequest>,
) -> Result<CallToolResult, McpError> {
    const TOOL: &str = "bulk_create";
    if let Some(email) = request.email.as_deref() {
        validation::check_length("email", email, 3, validation::MAX_NAME_CHARS)?;
        if !email.contains('@') {
            return Err(McpError::invalid_params("email must be an email address", None));
        }
    }

    let file = match local_file::read_csv_file(&request.file_path).await {
        Ok(file) => file,
        Err(err) => return Ok(local_error_result(TOOL, err)),
    };
    debug!(path = %file.path.display(), bytes = file.contents.len(), "uploading bulk import csv");

    let email = request.email.as_deref();
    let outcome = client
        .bulk_create(&file.file_name, &file.contents, email)
        .await;
    Ok(render(TOOL, outcome, |result| format_bulk_import(result, email)))
}
