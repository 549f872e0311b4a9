use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};

use crate::alttext::AltTextClient;
use crate::tools::{
    BulkCreateRequest, DeleteImageRequest, GenerateAltTextFromFileRequest, GenerateAltTextRequest,
    GetImageRequest, ListImagesRequest, ScrapePageRequest, SearchImagesRequest,
    TranslateImageRequest, UpdateAccountRequest, UpdateImageRequest,
};

const INSTRUCTIONS: &str = "Generate, translate and manage image alt text with AltText.ai. \
Each generation or translation consumes account credits; check them with get_account. \
scrape_page and bulk_create queue work in the background, so poll with list_images or get_image.";

#[derive(Clone)]
pub struct AltTextServer {
    tool_router: ToolRouter<Self>,
    client: Arc<AltTextClient>,
}

impl AltTextServer {
    pub fn new(client: Arc<AltTextClient>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            client,
        }
    }
}

#[tool_router]
impl AltTextServer {
    #[tool(description = "Show the AltText.ai account: name, remaining credits and default settings")]
    async fn get_account(&self) -> Result<CallToolResult, McpError> {
        crate::tools::get_account(&self.client).await
    }

    #[tool(description = "Update the account name, webhook URL or notification email")]
    async fn update_account(
        &self,
        Parameters(request): Parameters<UpdateAccountRequest>,
    ) -> Result<CallToolResult, McpError> {
        crate::tools::update_account(&self.client, Parameters(request)).await
    }

    #[tool(description = "Generate alt text for an image at a public URL. Consumes one credit")]
    async fn generate_alt_text(
        &self,
        Parameters(request): Parameters<GenerateAltTextRequest>,
    ) -> Result<CallToolResult, McpError> {
        crate::tools::generate_alt_text(&self.client, Parameters(request)).await
    }

    #[tool(description = "Generate alt text for a local image file. Consumes one credit")]
    async fn generate_alt_text_from_file(
        &self,
        Parameters(request): Parameters<GenerateAltTextFromFileRequest>,
    ) -> Result<CallToolResult, McpError> {
        crate::tools::generate_alt_text_from_file(&self.client, Parameters(request)).await
    }

    #[tool(description = "Translate the alt text of an existing image into another language. Consumes one credit")]
    async fn translate_image(
        &self,
        Parameters(request): Parameters<TranslateImageRequest>,
    ) -> Result<CallToolResult, McpError> {
        crate::tools::translate_image(&self.client, Parameters(request)).await
    }

    #[tool(description = "List images in the account, one page at a time")]
    async fn list_images(
        &self,
        Parameters(request): Parameters<ListImagesRequest>,
    ) -> Result<CallToolResult, McpError> {
        crate::tools::list_images(&self.client, Parameters(request)).await
    }

    #[tool(description = "Search images by alt text, tags or asset ID")]
    async fn search_images(
        &self,
        Parameters(request): Parameters<SearchImagesRequest>,
    ) -> Result<CallToolResult, McpError> {
        crate::tools::search_images(&self.client, Parameters(request)).await
    }

    #[tool(description = "Show one image with its alt text, translations, tags and metadata")]
    async fn get_image(
        &self,
        Parameters(request): Parameters<GetImageRequest>,
    ) -> Result<CallToolResult, McpError> {
        crate::tools::get_image(&self.client, Parameters(request)).await
    }

    #[tool(description = "Edit the alt text, tags or metadata of an image")]
    async fn update_image(
        &self,
        Parameters(request): Parameters<UpdateImageRequest>,
    ) -> Result<CallToolResult, McpError> {
        crate::tools::update_image(&self.client, Parameters(request)).await
    }

    #[tool(description = "Delete an image from the account")]
    async fn delete_image(
        &self,
        Parameters(request): Parameters<DeleteImageRequest>,
    ) -> Result<CallToolResult, McpError> {
        crate::tools::delete_image(&self.client, Parameters(request)).await
    }

    #[tool(description = "Import many images from a local CSV file. Processing happens in the background")]
    async fn bulk_create(
        &self,
        Parameters(request): Parameters<BulkCreateRequest>,
    ) -> Result<CallToolResult, McpError> {
        crate::tools::bulk_create(&self.client, Parameters(request)).await
    }

    #[tool(
        description = "Find images on a web page and queue alt text generation for them. Results arrive asynchronously"
    )]
    async fn scrape_page(
        &self,
        Parameters(request): Parameters<ScrapePageRequest>,
    ) -> Result<CallToolResult, McpError> {
        crate::tools::scrape_page(&self.client, Parameters(request)).await
    }
}

#[tool_handler]
impl ServerHandler for AltTextServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> AltTextServer {
        let client = AltTextClient::new("test-key", Some("http://127.0.0.1:9"), None).unwrap();
        AltTextServer::new(Arc::new(client))
    }

    #[test]
    fn registers_every_tool() {
        let mut names: Vec<String> = server()
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "bulk_create",
                "delete_image",
                "generate_alt_text",
                "generate_alt_text_from_file",
                "get_account",
                "get_image",
                "list_images",
                "scrape_page",
                "search_images",
                "translate_image",
                "update_account",
                "update_image",
            ]
        );
    }

    fn property(tool: &str, name: &str) -> serde_json::Value {
        let tool = server()
            .tool_router
            .list_all()
            .into_iter()
            .find(|candidate| candidate.name == tool)
            .unwrap();
        tool.input_schema
            .get("properties")
            .and_then(|properties| properties.get(name))
            .cloned()
            .unwrap_or_else(|| panic!("missing property {name}"))
    }

    #[test]
    fn input_schemas_carry_bounds() {
        let limit = property("list_images", "limit");
        assert_eq!(limit["minimum"].as_f64(), Some(1.0));
        assert_eq!(limit["maximum"].as_f64(), Some(100.0));

        let max_chars = property("generate_alt_text", "max_chars");
        assert_eq!(max_chars["minimum"].as_f64(), Some(1.0));
        assert_eq!(max_chars["maximum"].as_f64(), Some(1000.0));

        let keywords = property("generate_alt_text", "keywords");
        assert_eq!(keywords["maxItems"].as_u64(), Some(6));

        let lang = property("translate_image", "lang");
        assert_eq!(lang["minLength"].as_u64(), Some(2));
        assert_eq!(lang["maxLength"].as_u64(), Some(10));

        assert_eq!(property("search_images", "query")["maxLength"].as_u64(), Some(500));
        assert_eq!(property("update_image", "tags")["maxItems"].as_u64(), Some(50));
    }

    #[test]
    fn flattened_generation_args_do_not_replace_tool_descriptions() {
        let tool = server()
            .tool_router
            .list_all()
            .into_iter()
            .find(|candidate| candidate.name == "generate_alt_text")
            .unwrap();
        let description = tool.input_schema.get("description").and_then(|value| value.as_str());
        assert!(description.is_none_or(|text| !text.contains("Generation settings")));
    }

    #[test]
    fn advertises_tools_capability() {
        let info = server().get_info();
        assert!(info.capabilities.tools.is_some());
        assert_eq!(info.server_info.name, "alttext-ai-mcp");
    }
}
