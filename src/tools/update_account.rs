use rmcp::{
    ErrorData as McpError,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars::JsonSchema,
};
use serde::Deserialize;

use crate::{
    alttext::{AltTextClient, UpdateAccount},
    format::format_account,
    tools::{render, validation},
};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateAccountRequest {
    #[schemars(description = "Account display name", length(min = 1, max = 255))]
    pub name: Option<String>,
    #[schemars(
        description = "URL that receives a POST when asynchronous jobs finish",
        length(min = 1, max = 2048)
    )]
    pub webhook_url: Option<String>,
    #[schemars(description = "Email address for account notifications", length(min = 3, max = 255))]
    pub notification_email: Option<String>,
}

pub async fn update_account(
    client: &AltTextClient,
    Parameters(request): Parameters<UpdateAccountRequest>,
) -> Result<CallToolResult, McpError> {
    if request.name.is_none() && request.webhook_url.is_none() && request.notification_email.is_none() {
        return Err(McpError::invalid_params(
            "provide at least one of name, webhook_url, notification_email",
            None,
        ));
    }
    validation::check_optional_length("name", request.name.as_deref(), 1, validation::MAX_NAME_CHARS)?;
    if let Some(webhook_url) = request.webhook_url.as_deref() {
        validation::validate_http_url("webhook_url", webhook_url)?;
    }
    if let Some(email) = request.notification_email.as_deref() {
        validation::check_length("notification_email", email, 3, validation::MAX_NAME_CHARS)?;
        if !email.contains('@') {
            return Err(McpError::invalid_params(
                "notification_email must be an email address",
                None,
            ));
        }
    }

    let update = UpdateAccount {
        name: request.name,
        webhook_url: request.webhook_url,
        notification_email: request.notification_email,
    };
    Ok(render(
        "update_account",
        client.update_account(&update).await,
        format_account,
    ))
}
