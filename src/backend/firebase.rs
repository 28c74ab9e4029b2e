//! REST client for the hosted backend project (storage, realtime database and
//! document store).

use std::sync::RwLock;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Map, Number, Value};

use super::helpers::normalize_timestamp;
use super::{BackendConfig, BackendError, Document, DocumentStore, ObjectStore, RealtimeDatabase};

const STORAGE_API: &str = "https://firebasestorage.googleapis.com/v0/b";
const FIRESTORE_API: &str = "https://firestore.googleapis.com/v1";

pub struct FirebaseRest {
    http: Client,
    config: BackendConfig,
    id_token: RwLock<Option<String>>,
}

impl FirebaseRest {
    pub fn new(config: BackendConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs.max(1)))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            config,
            id_token: RwLock::new(None),
        })
    }

    pub fn http(&self) -> Client {
        self.http.clone()
    }

    /// Installs (or clears) the signed-in user's ID token for later requests.
    pub fn set_id_token(&self, token: Option<String>) {
        let mut guard = match self.id_token.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = token;
    }

    fn id_token(&self) -> Option<String> {
        match self.id_token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn object_url(&self, path: &str) -> String {
        format!(
            "{STORAGE_API}/{}/o/{}",
            self.config.storage_bucket,
            urlencoding::encode(path)
        )
    }

    async fn send_json(&self, request: RequestBuilder) -> Result<Value> {
        let response = request.send().await.context("request failed")?;
        let url = response.url().to_string();
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Http {
                url,
                status: status.as_u16(),
                body,
            }
            .into());
        }

        response
            .json::<Value>()
            .await
            .with_context(|| format!("invalid JSON from {url}"))
    }
}

#[async_trait]
impl ObjectStore for FirebaseRest {
    /// Resolves an object to its tokenized media URL, the same URL the
    /// storage SDK hands out. Fails when the object does not exist.
    async fn download_url(&self, path: &str) -> Result<String> {
        let base = self.object_url(path);
        let mut request = self.http.get(&base);
        if let Some(token) = self.id_token() {
            request = request.header("Authorization", format!("Firebase {token}"));
        }

        let metadata = self
            .send_json(request)
            .await
            .with_context(|| format!("failed to stat object {path}"))?;

        let token = metadata
            .get("downloadTokens")
            .and_then(Value::as_str)
            .and_then(|tokens| tokens.split(',').next())
            .filter(|token| !token.is_empty());

        Ok(match token {
            Some(token) => format!("{base}?alt=media&token={token}"),
            None => format!("{base}?alt=media"),
        })
    }

    async fn fetch_json(&self, url: &str) -> Result<Value> {
        self.send_json(self.http.get(url)).await
    }
}

#[async_trait]
impl RealtimeDatabase for FirebaseRest {
    async fn read(&self, path: &str) -> Result<Value> {
        let url = format!(
            "{}/{}.json",
            self.config.database_url.trim_end_matches('/'),
            path.trim_matches('/')
        );
        let mut request = self.http.get(&url);
        if let Some(token) = self.id_token() {
            request = request.query(&[("auth", token)]);
        }

        self.send_json(request)
            .await
            .with_context(|| format!("failed to read realtime path {path}"))
    }
}

#[async_trait]
impl DocumentStore for FirebaseRest {
    async fn query_latest(
        &self,
        collection: &str,
        order_by: &str,
        limit: usize,
    ) -> Result<Vec<Document>> {
        let url = format!(
            "{FIRESTORE_API}/projects/{}/databases/(default)/documents:runQuery",
            self.config.project_id
        );
        let body = json!({
            "structuredQuery": {
                "from": [{ "collectionId": collection }],
                "orderBy": [{ "field": { "fieldPath": order_by }, "direction": "DESCENDING" }],
                "limit": limit
            }
        });

        let mut request = self.http.post(&url).json(&body);
        if let Some(token) = self.id_token() {
            request = request.bearer_auth(token);
        }

        let response = self
            .send_json(request)
            .await
            .with_context(|| format!("failed to query {collection}"))?;

        decode_query_response(response)
    }
}

/// Turns a `runQuery` response into documents with plain JSON fields.
/// Rows without a `document` (e.g. the trailing read-time marker) are dropped.
pub fn decode_query_response(response: Value) -> Result<Vec<Document>> {
    let rows = match response {
        Value::Array(rows) => rows,
        other => return Err(anyhow!("unexpected runQuery response: {other}")),
    };

    let mut documents = Vec::new();
    for row in rows {
        let Some(document) = row.get("document") else {
            continue;
        };
        let id = document
            .get("name")
            .and_then(Value::as_str)
            .and_then(|name| name.rsplit('/').next())
            .ok_or_else(|| anyhow!("document without a name"))?
            .to_string();
        let fields = document
            .get("fields")
            .and_then(Value::as_object)
            .map(decode_fields)
            .unwrap_or_else(|| Value::Object(Map::new()));

        documents.push(Document { id, fields });
    }
    Ok(documents)
}

fn decode_fields(fields: &Map<String, Value>) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(key, value)| (key.clone(), decode_value(value)))
            .collect(),
    )
}

/// Decodes one typed value (`{"stringValue": "..."}` and friends).
fn decode_value(value: &Value) -> Value {
    let Some((kind, inner)) = value.as_object().and_then(|obj| obj.iter().next()) else {
        return Value::Null;
    };

    match kind.as_str() {
        "stringValue" | "referenceValue" | "bytesValue" | "booleanValue" => inner.clone(),
        "nullValue" => Value::Null,
        "integerValue" => inner
            .as_str()
            .and_then(|raw| raw.parse::<i64>().ok())
            .map(|n| Value::Number(n.into()))
            .unwrap_or_else(|| inner.clone()),
        "doubleValue" => inner
            .as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        "timestampValue" => inner
            .as_str()
            .map(|raw| Value::String(normalize_timestamp(raw)))
            .unwrap_or(Value::Null),
        "mapValue" => inner
            .get("fields")
            .and_then(Value::as_object)
            .map(decode_fields)
            .unwrap_or_else(|| Value::Object(Map::new())),
        "arrayValue" => Value::Array(
            inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(decode_value).collect())
                .unwrap_or_default(),
        ),
        _ => inner.clone(),
    }
}
