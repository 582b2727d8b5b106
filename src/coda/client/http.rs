use super::CodaClient;
use crate::error::{CodaError, Result};
use reqwest::blocking::{Client, Response};
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://coda.io/apis/v1";

/// Longest error body excerpt carried into a transport error.
const BODY_EXCERPT_CHARS: usize = 200;

/// Blocking client for the Coda REST API.
pub struct HttpClient {
    http: Client,
    api_base: String,
    api_key: Option<String>,
}

impl HttpClient {
    /// Build a client. A missing key only fails once a request is attempted.
    pub fn new(api_key: Option<&str>, api_base: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CodaError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.map(str::to_string),
        })
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            CodaError::Config("no API key: set CODA_API_KEY or add it to config.json".to_string())
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    fn send_get(
        &self,
        operation: &'static str,
        target: &str,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Response> {
        let key = self.api_key()?;
        tracing::debug!(operation, target, path, "GET");
        self.http
            .get(self.url(path))
            .bearer_auth(key)
            .query(query)
            .send()
            .map_err(|e| CodaError::transport(operation, target, e.to_string()))
    }

    /// GET a single resource and return its body verbatim.
    fn get_text(&self, operation: &'static str, target: &str, path: &str) -> Result<String> {
        let response = self.send_get(operation, target, path, &[])?;
        read_success(operation, target, response)
    }

    /// GET a list resource, following pagination, and return the items as a JSON array.
    fn get_items(
        &self,
        operation: &'static str,
        target: &str,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<String> {
        let mut items: Vec<Value> = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut params: Vec<(&str, &str)> = query.to_vec();
            if let Some(token) = page_token.as_deref() {
                params.push(("pageToken", token));
            }

            let response = self.send_get(operation, target, path, &params)?;
            let body = read_success(operation, target, response)?;
            let page: Value = serde_json::from_str(&body).map_err(|e| {
                CodaError::transport(operation, target, format!("invalid JSON body: {}", e))
            })?;

            if let Some(Value::Array(page_items)) = page.get("items") {
                items.extend(page_items.iter().cloned());
            }

            match page.get("nextPageToken").and_then(Value::as_str) {
                Some(next) if !next.is_empty() => page_token = Some(next.to_string()),
                _ => break,
            }
        }

        Ok(Value::Array(items).to_string())
    }

    /// POST a create request. API refusals come back as `{"error": ...}`.
    fn post_create(
        &self,
        operation: &'static str,
        target: &str,
        path: &str,
        body: &Value,
    ) -> Result<String> {
        let key = self.api_key()?;
        tracing::debug!(operation, target, path, "POST");
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(key)
            .json(body)
            .send()
            .map_err(|e| CodaError::transport(operation, target, e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| CodaError::transport(operation, target, e.to_string()))?;

        if status.is_success() {
            Ok(text)
        } else {
            let message = format!("HTTP {}: {}", status.as_u16(), error_message(&text));
            Ok(json!({ "error": message }).to_string())
        }
    }
}

fn read_success(operation: &'static str, target: &str, response: Response) -> Result<String> {
    let status = response.status();
    let text = response
        .text()
        .map_err(|e| CodaError::transport(operation, target, e.to_string()))?;

    if status.is_success() {
        Ok(text)
    } else {
        Err(CodaError::transport(
            operation,
            target,
            format!("HTTP {}: {}", status.as_u16(), error_message(&text)),
        ))
    }
}

/// Pull the human-readable message out of an API error body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("statusMessage"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.chars().take(BODY_EXCERPT_CHARS).collect())
}

impl CodaClient for HttpClient {
    fn list_docs(&self) -> Result<String> {
        self.get_items("list-docs", "owned docs", "/docs", &[("isOwner", "true")])
    }

    fn get_doc(&self, doc_id: &str) -> Result<String> {
        self.get_text("get-doc", doc_id, &format!("/docs/{}", doc_id))
    }

    fn list_sections(&self, doc_id: &str) -> Result<String> {
        self.get_items("list-sections", doc_id, &format!("/docs/{}/pages", doc_id), &[])
    }

    fn get_section(&self, doc_id: &str, section_id: &str) -> Result<String> {
        self.get_text(
            "get-section",
            &format!("{}/{}", doc_id, section_id),
            &format!("/docs/{}/pages/{}", doc_id, section_id),
        )
    }

    fn list_tables(&self, doc_id: &str) -> Result<String> {
        self.get_items(
            "list-tables",
            doc_id,
            &format!("/docs/{}/tables", doc_id),
            &[("tableTypes", "table")],
        )
    }

    fn list_views(&self, doc_id: &str) -> Result<String> {
        self.get_items(
            "list-views",
            doc_id,
            &format!("/docs/{}/tables", doc_id),
            &[("tableTypes", "view")],
        )
    }

    fn list_columns(&self, doc_id: &str, table_id: &str) -> Result<String> {
        self.get_items(
            "list-columns",
            &format!("{}/{}", doc_id, table_id),
            &format!("/docs/{}/tables/{}/columns", doc_id, table_id),
            &[],
        )
    }

    fn get_column(&self, doc_id: &str, table_id: &str, column_id: &str) -> Result<String> {
        self.get_text(
            "get-column",
            &format!("{}/{}/{}", doc_id, table_id, column_id),
            &format!("/docs/{}/tables/{}/columns/{}", doc_id, table_id, column_id),
        )
    }

    fn list_rows(&self, doc_id: &str, table_id: &str) -> Result<String> {
        self.get_items(
            "list-rows",
            &format!("{}/{}", doc_id, table_id),
            &format!("/docs/{}/tables/{}/rows", doc_id, table_id),
            &[],
        )
    }

    fn list_controls(&self, doc_id: &str) -> Result<String> {
        self.get_items("list-controls", doc_id, &format!("/docs/{}/controls", doc_id), &[])
    }

    fn list_folders(&self, doc_id: &str) -> Result<String> {
        self.get_items("list-folders", doc_id, &format!("/docs/{}/folders", doc_id), &[])
    }

    fn list_formulas(&self, doc_id: &str) -> Result<String> {
        self.get_items("list-formulas", doc_id, &format!("/docs/{}/formulas", doc_id), &[])
    }

    fn create_document(&self, name: &str) -> Result<String> {
        self.post_create("create-document", name, "/docs", &json!({ "title": name }))
    }

    fn add_section(
        &self,
        doc_id: &str,
        name: &str,
        section_type: &str,
        content: &str,
    ) -> Result<String> {
        let body = json!({
            "name": name,
            "pageContent": {
                "type": section_type,
                "canvasContent": {
                    "format": "markdown",
                    "content": content,
                },
            },
        });
        self.post_create(
            "add-section",
            &format!("{}/{}", doc_id, name),
            &format!("/docs/{}/pages", doc_id),
            &body,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn client_for(server: &Server) -> HttpClient {
        HttpClient::new(Some("test-key"), &server.url(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_get_doc_sends_bearer_token() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/docs/doc-1")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_body(r#"{"id":"doc-1","name":"Alpha","ownerName":"Ann"}"#)
            .create();

        let body = client_for(&server).get_doc("doc-1").unwrap();
        assert!(body.contains("\"Alpha\""));
        mock.assert();
    }

    #[test]
    fn test_list_follows_pagination() {
        let mut server = Server::new();
        let first = server
            .mock("GET", "/docs/doc-1/pages")
            .match_query(Matcher::Missing)
            .with_status(200)
            .with_body(r#"{"items":[{"name":"One"}],"nextPageToken":"p2"}"#)
            .create();
        let second = server
            .mock("GET", "/docs/doc-1/pages")
            .match_query(Matcher::UrlEncoded("pageToken".into(), "p2".into()))
            .with_status(200)
            .with_body(r#"{"items":[{"name":"Two"}]}"#)
            .create();

        let body = client_for(&server).list_sections("doc-1").unwrap();
        let items: Vec<Value> = serde_json::from_str(&body).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1]["name"], "Two");
        first.assert();
        second.assert();
    }

    #[test]
    fn test_read_failure_is_transport_error() {
        let mut server = Server::new();
        server
            .mock("GET", "/docs/missing")
            .with_status(404)
            .with_body(r#"{"statusCode":404,"statusMessage":"Not Found","message":"No such doc"}"#)
            .create();

        let err = client_for(&server).get_doc("missing").unwrap_err();
        match err {
            CodaError::Transport {
                operation, message, ..
            } => {
                assert_eq!(operation, "get-doc");
                assert!(message.contains("404"));
                assert!(message.contains("No such doc"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_create_refusal_becomes_error_field() {
        let mut server = Server::new();
        server
            .mock("POST", "/docs")
            .match_body(Matcher::Json(json!({"title": "Renamed"})))
            .with_status(429)
            .with_body(r#"{"message":"rate limit"}"#)
            .create();

        let body = client_for(&server).create_document("Renamed").unwrap();
        let value: Value = serde_json::from_str(&body).unwrap();
        assert!(value["error"].as_str().unwrap().contains("rate limit"));
    }

    #[test]
    fn test_add_section_posts_markdown_page() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", "/docs/doc-9/pages")
            .match_body(Matcher::PartialJson(json!({
                "name": "Intro",
                "pageContent": {"type": "canvas", "canvasContent": {"format": "markdown"}}
            })))
            .with_status(202)
            .with_body(r#"{"id":"canvas-1","requestId":"r-1"}"#)
            .create();

        let body = client_for(&server)
            .add_section("doc-9", "Intro", "canvas", "# Intro")
            .unwrap();
        assert!(body.contains("canvas-1"));
        mock.assert();
    }

    #[test]
    fn test_missing_key_fails_before_sending() {
        let mut server = Server::new();
        let mock = server.mock("GET", Matcher::Any).expect(0).create();

        let client = HttpClient::new(None, &server.url(), Duration::from_secs(5)).unwrap();
        assert!(matches!(client.list_docs(), Err(CodaError::Config(_))));
        mock.assert();
    }
}
