use crate::contract::SynthesisOptions;
use crate::error::Result;
use crate::tools::utils::normalize_url;
use crate::tools::{Tool, ToolContext, ToolResult};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GenerateContractParams {
    /// Page to load and describe
    pub url: String,

    /// Contract name; derived from the page title when absent
    #[serde(default)]
    pub name: Option<String>,

    /// List required fields on form actions
    #[serde(default)]
    pub carry_required: bool,
}

/// Load a page and describe its actions as a contract
#[derive(Default)]
pub struct GenerateContractTool;

#[async_trait]
impl Tool for GenerateContractTool {
    type Params = GenerateContractParams;

    fn name(&self) -> &str {
        "generate_contract"
    }

    async fn execute_typed(
        &self,
        params: GenerateContractParams,
        context: &mut ToolContext<'_>,
    ) -> Result<ToolResult> {
        let url = normalize_url(&params.url);
        let mut options = SynthesisOptions::new().carry_required(params.carry_required);
        if let Some(name) = params.name {
            options = options.name_hint(name);
        }

        let contract = context.session.generate_contract(&url, options).await?;
        let message = format!(
            "Contract '{}' with {} action(s) and {} network action(s)",
            contract.name,
            contract.actions.len(),
            contract.network_actions.len()
        );
        Ok(ToolResult::success_with(message, serde_json::json!({ "contract": contract })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::{Session, SessionConfig};
    use crate::testing::FakePage;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_generate_contract_response() {
        let page = Arc::new(FakePage::new().with_html(
            r#"<title>Acme Store</title><form method="post" action="/cart"><input name="sku" required><input name="qty" type="number"><button>Add to cart</button></form>"#,
        ));
        let mut session = Session::new(SessionConfig::default().settle_window(Duration::ZERO));
        session.attach(page);
        let mut context = ToolContext::new(&mut session);

        let params = GenerateContractParams {
            url: "acme.test".to_string(),
            name: None,
            carry_required: true,
        };
        let response = GenerateContractTool
            .execute_typed(params, &mut context)
            .await
            .unwrap()
            .to_response();

        let contract = &response["contract"];
        assert_eq!(contract["name"], "Acme_Store");
        assert_eq!(contract["actions"][0]["name"], "add_to_cart");
        assert_eq!(contract["actions"][0]["method"], "POST");
        assert_eq!(contract["actions"][0]["endpoint"], "https://acme.test/cart");
        assert_eq!(contract["actions"][0]["schema"]["qty"], "number");
        assert_eq!(contract["actions"][0]["required"], serde_json::json!(["sku"]));
        assert!(contract.get("networkActions").is_none());
    }
}
