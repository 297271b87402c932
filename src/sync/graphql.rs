use serde::Deserialize;
use serde_json::Value;

use crate::core::item::{ShoppingList, ShoppingListItem};
use crate::sync::ListService;

// Fixed shapes of the list backend. Only the flat `items` variable form of
// the update mutation is supported.
const READ_QUERY: &str = "{ primaryShoppingList { id name items { id status value } } }";
const UPDATE_MUTATION: &str = "mutation UpdateItems($items: [ShoppingListItemInput!]!) \
     { updateShoppingListItems(items: $items) { id value status } }";
const DELETE_MUTATION: &str = "mutation DeleteItems($items: [ShoppingListItemInput!]!) \
     { deleteShoppingListItems(items: $items) { id } }";

/// An id echoed back by the delete mutation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeletedItem {
    pub id: String,
}

/// Stateless client for the list service's GraphQL endpoint.
#[derive(Clone)]
pub struct GraphqlListClient {
    endpoint: String,
    http: reqwest::Client,
}

impl GraphqlListClient {
    pub fn new(endpoint: &str) -> Result<Self, String> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {}", e))?;
        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// POST one operation and unwrap the response envelope down to `data`.
    async fn post(&self, query: &str, variables: Option<Value>) -> Result<Value, String> {
        let body = request_body(query, variables);

        let resp = self
            .http
            .post(&self.endpoint)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("Request failed: {}", e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(format!("API error {}: {}", status, text));
        }

        let envelope: Value = resp
            .json()
            .await
            .map_err(|e| format!("Failed to parse API response: {}", e))?;

        extract_data(envelope)
    }
}

impl ListService for GraphqlListClient {
    async fn fetch_list(&self) -> Result<ShoppingList, String> {
        let data = self.post(READ_QUERY, None).await?;
        parse_list(data)
    }

    async fn update_items(
        &self,
        items: &[ShoppingListItem],
    ) -> Result<Vec<ShoppingListItem>, String> {
        let vars = serde_json::json!({ "items": items });
        let data = self.post(UPDATE_MUTATION, Some(vars)).await?;
        parse_updated(data)
    }

    async fn delete_items(&self, items: &[ShoppingListItem]) -> Result<Vec<DeletedItem>, String> {
        let vars = serde_json::json!({ "items": items });
        let data = self.post(DELETE_MUTATION, Some(vars)).await?;
        parse_deleted(data)
    }
}

fn request_body(query: &str, variables: Option<Value>) -> Value {
    let mut body = serde_json::json!({ "query": query });
    if let Some(vars) = variables {
        body["variables"] = vars;
    }
    body
}

/// Surface GraphQL-level errors and peel the envelope down to `data`.
fn extract_data(envelope: Value) -> Result<Value, String> {
    if let Some(errors) = envelope.get("errors").and_then(|e| e.as_array()) {
        if !errors.is_empty() {
            let messages: Vec<&str> = errors
                .iter()
                .filter_map(|e| e["message"].as_str())
                .collect();
            let detail = if messages.is_empty() {
                "unknown error".to_string()
            } else {
                messages.join("; ")
            };
            return Err(format!("GraphQL error: {}", detail));
        }
    }

    match envelope.get("data") {
        Some(data) if !data.is_null() => Ok(data.clone()),
        _ => Err("No data in API response".to_string()),
    }
}

fn parse_list(data: Value) -> Result<ShoppingList, String> {
    let node = data
        .get("primaryShoppingList")
        .cloned()
        .ok_or_else(|| "No primaryShoppingList in response".to_string())?;
    serde_json::from_value(node).map_err(|e| format!("Failed to parse shopping list: {}", e))
}

fn parse_updated(data: Value) -> Result<Vec<ShoppingListItem>, String> {
    let node = data
        .get("updateShoppingListItems")
        .cloned()
        .ok_or_else(|| "No updateShoppingListItems in response".to_string())?;
    serde_json::from_value(node).map_err(|e| format!("Failed to parse updated items: {}", e))
}

fn parse_deleted(data: Value) -> Result<Vec<DeletedItem>, String> {
    let node = data
        .get("deleteShoppingListItems")
        .cloned()
        .ok_or_else(|| "No deleteShoppingListItems in response".to_string())?;
    serde_json::from_value(node).map_err(|e| format!("Failed to parse deleted items: {}", e))
}
