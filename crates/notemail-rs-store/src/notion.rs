//! Notion-backed message store.
//!
//! Every message is a page in one database. Queries follow `next_cursor`
//! until `has_more` is false so callers always see the full result set.

use crate::error::StoreError;
use crate::filter::MessageFilter;
use crate::provider::MessageStore;
use crate::schema::{DatabaseObject, DatabaseSchema, MessageProperties, PageObject, decode_page};
use async_trait::async_trait;
use log::{debug, warn};
use notemail_rs_protocol::{Message, MessageId, StoredMessage};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;

/// Connection options for [`NotionStore`].
#[derive(Clone)]
pub struct NotionStoreOptions {
    /// API host, e.g. `https://api.notion.com`; paths are under `/v1`.
    pub api_base: String,
    /// Value of the `Notion-Version` header.
    pub notion_version: String,
    /// Integration token.
    pub token: String,
    /// Database holding the messages.
    pub database_id: String,
    /// Rows requested per query page.
    pub page_size: u32,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl std::fmt::Debug for NotionStoreOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotionStoreOptions")
            .field("api_base", &self.api_base)
            .field("notion_version", &self.notion_version)
            .field("token", &"[REDACTED]")
            .field("database_id", &self.database_id)
            .field("page_size", &self.page_size)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// Message store talking to the Notion REST API.
#[derive(Debug, Clone)]
pub struct NotionStore {
    client: Client,
    options: NotionStoreOptions,
}

#[derive(Debug, Serialize)]
struct CreatePageRequest<'a> {
    parent: Parent<'a>,
    properties: MessageProperties,
}

#[derive(Debug, Serialize)]
struct Parent<'a> {
    database_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<Value>,
    #[serde(default)]
    has_more: bool,
    next_cursor: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

impl NotionStore {
    /// Build a store with its own HTTP client.
    pub fn new(options: NotionStoreOptions) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(options.timeout)
            .connect_timeout(options.connect_timeout)
            .build()?;
        Ok(Self { client, options })
    }

    /// Database this store reads and writes.
    pub fn database_id(&self) -> &str {
        &self.options.database_id
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.options.api_base.trim_end_matches('/'), path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .bearer_auth(&self.options.token)
            .header("Notion-Version", &self.options.notion_version)
    }

    /// Send a request and decode a JSON body, mapping API failures.
    async fn send(&self, builder: RequestBuilder) -> Result<Value, StoreError> {
        let response = self.authorized(builder).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<Value>().await?);
        }
        let text = response.text().await.unwrap_or_default();
        let body: ApiErrorBody = serde_json::from_str(&text).unwrap_or_default();
        debug!(
            "store request failed (status={}, code={}, message={})",
            status, body.code, body.message
        );
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(body.message));
        }
        Err(StoreError::Api {
            status: status.as_u16(),
            code: body.code,
            message: if body.message.is_empty() { text } else { body.message },
        })
    }

    async fn query_page(
        &self,
        filter: Option<&Value>,
        cursor: Option<&str>,
    ) -> Result<QueryResponse, StoreError> {
        let mut body = json!({ "page_size": self.options.page_size });
        if let Some(filter) = filter {
            body["filter"] = filter.clone();
        }
        if let Some(cursor) = cursor {
            body["start_cursor"] = Value::String(cursor.to_string());
        }
        let url = self.url(&format!("databases/{}/query", self.options.database_id));
        let value = self.send(self.client.post(url).json(&body)).await?;
        Ok(serde_json::from_value(value)?)
    }
}

#[async_trait]
impl MessageStore for NotionStore {
    async fn create(&self, message: &Message) -> Result<MessageId, StoreError> {
        let request = CreatePageRequest {
            parent: Parent {
                database_id: &self.options.database_id,
            },
            properties: MessageProperties::from(message),
        };
        let value = self
            .send(self.client.post(self.url("pages")).json(&request))
            .await?;
        let page: PageObject = decode_page(value)?;
        debug!("message created (id={})", page.id);
        Ok(page.id)
    }

    async fn query(&self, filter: &MessageFilter) -> Result<Vec<StoredMessage>, StoreError> {
        let filter = filter.to_query_filter();
        let mut messages = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;
        loop {
            let response = self.query_page(filter.as_ref(), cursor.as_deref()).await?;
            pages += 1;
            for row in response.results {
                let page = decode_page(row)?;
                if page.is_message_row() {
                    messages.push(page.into_stored());
                }
            }
            if !response.has_more {
                break;
            }
            match response.next_cursor {
                Some(next) => cursor = Some(next),
                None => {
                    warn!("query reported more results without a cursor (pages={pages})");
                    break;
                }
            }
        }
        debug!(
            "query complete (pages={}, messages={})",
            pages,
            messages.len()
        );
        Ok(messages)
    }

    async fn retrieve(&self, id: &str) -> Result<StoredMessage, StoreError> {
        let value = self
            .send(self.client.get(self.url(&format!("pages/{id}"))))
            .await
            .map_err(|err| match err {
                StoreError::NotFound(_) => StoreError::NotFound(id.to_string()),
                other => other,
            })?;
        let page = decode_page(value)?;
        if !page.is_message_row() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(page.into_stored())
    }

    async fn describe_schema(&self) -> Result<DatabaseSchema, StoreError> {
        let url = self.url(&format!("databases/{}", self.options.database_id));
        let value = self.send(self.client.get(url)).await?;
        let object: DatabaseObject = serde_json::from_value(value)?;
        Ok(object.into())
    }
}
