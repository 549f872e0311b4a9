use rmcp::{ErrorData as McpError, model::CallToolResult};

use crate::{alttext::AltTextClient, format::format_account, tools::render};

pub async fn get_account(client: &AltTextClient) -> Result<CallToolResult, McpError> {
    Ok(render("get_account", client.get_account().await, format_account))
}
