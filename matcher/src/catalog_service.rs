use crate::config::Config;
use crate::error::ConfigError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Number, Value};

const PAGE_SIZE: u32 = 300;

/// Read-only source of aid-program records.
#[async_trait]
pub trait ResourceCatalog: Send + Sync {
    /// Every record currently in the catalog, unfiltered.
    async fn fetch_all(&self) -> Result<Vec<Value>>;
}

/// Lists a Cloud Firestore collection through the REST API.
pub struct FirestoreCatalog {
    client: Client,
    api_base: String,
    project_id: Option<String>,
    api_key: Option<String>,
    collection: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<FirestoreDocument>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FirestoreDocument {
    #[serde(default)]
    fields: Map<String, Value>,
}

impl FirestoreCatalog {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            api_base: config.firestore_api_base.trim_end_matches('/').to_string(),
            project_id: config.firebase_project_id.clone(),
            api_key: config.firebase_api_key.clone(),
            collection: config.collection.clone(),
        }
    }

    fn list_url(&self, project_id: &str, page_token: Option<&str>) -> String {
        let mut url = format!(
            "{}/v1/projects/{}/databases/(default)/documents/{}?pageSize={}",
            self.api_base,
            urlencoding::encode(project_id),
            urlencoding::encode(&self.collection),
            PAGE_SIZE
        );
        if let Some(token) = page_token {
            url.push_str("&pageToken=");
            url.push_str(&urlencoding::encode(token));
        }
        if let Some(key) = &self.api_key {
            url.push_str("&key=");
            url.push_str(&urlencoding::encode(key));
        }
        url
    }

    async fn fetch_page(&self, project_id: &str, page_token: Option<&str>) -> Result<ListDocumentsResponse> {
        let response = self
            .client
            .get(self.list_url(project_id, page_token))
            .send()
            .await
            .context("Firestore request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Firestore API error ({}): {}", status, error_text));
        }

        response
            .json()
            .await
            .context("Firestore returned an unreadable listing")
    }
}

#[async_trait]
impl ResourceCatalog for FirestoreCatalog {
    async fn fetch_all(&self) -> Result<Vec<Value>> {
        let project_id = self
            .project_id
            .as_deref()
            .ok_or(ConfigError::Missing("FIREBASE_PROJECT_ID"))?;

        let mut records = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let page = self.fetch_page(project_id, page_token.as_deref()).await?;
            records.extend(page.documents.into_iter().map(|doc| decode_fields(doc.fields)));
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        log::debug!("Loaded {} records from collection '{}'", records.len(), self.collection);
        Ok(records)
    }
}

/// Convert a Firestore `fields` map into a plain JSON object.
pub fn decode_fields(fields: Map<String, Value>) -> Value {
    Value::Object(
        fields
            .into_iter()
            .map(|(name, value)| (name, decode_value(value)))
            .collect(),
    )
}

/// Convert one typed Firestore value (`{"stringValue": "..."}` etc.) into plain JSON.
pub fn decode_value(value: Value) -> Value {
    let Value::Object(mut typed) = value else {
        return value;
    };

    if let Some(v) = typed.remove("stringValue") {
        return v;
    }
    if let Some(v) = typed.remove("booleanValue") {
        return v;
    }
    if let Some(v) = typed.remove("integerValue") {
        // int64 values arrive as strings.
        let parsed = v.as_str().and_then(|s| s.parse::<i64>().ok());
        return parsed.map(Value::from).unwrap_or(v);
    }
    if let Some(v) = typed.remove("doubleValue") {
        let parsed = v
            .as_str()
            .and_then(|s| s.parse::<f64>().ok())
            .and_then(Number::from_f64);
        return parsed.map(Value::Number).unwrap_or(v);
    }
    if typed.contains_key("nullValue") {
        return Value::Null;
    }
    for key in ["timestampValue", "bytesValue", "referenceValue"] {
        if let Some(v) = typed.remove(key) {
            return v;
        }
    }
    if let Some(v) = typed.remove("geoPointValue") {
        let lat = v.get("latitude").cloned().unwrap_or(Value::from(0.0));
        let lng = v.get("longitude").cloned().unwrap_or(Value::from(0.0));
        let mut point = Map::new();
        point.insert("latitude".to_string(), lat);
        point.insert("longitude".to_string(), lng);
        return Value::Object(point);
    }
    if let Some(v) = typed.remove("arrayValue") {
        let values = match v.get("values") {
            Some(Value::Array(items)) => items.iter().cloned().map(decode_value).collect(),
            _ => Vec::new(),
        };
        return Value::Array(values);
    }
    if let Some(v) = typed.remove("mapValue") {
        return match v {
            Value::Object(mut map) => match map.remove("fields") {
                Some(Value::Object(fields)) => decode_fields(fields),
                _ => Value::Object(Map::new()),
            },
            _ => Value::Object(Map::new()),
        };
    }

    Value::Object(typed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalar_values_decode() {
        assert_eq!(decode_value(json!({"stringValue": "JKM"})), json!("JKM"));
        assert_eq!(decode_value(json!({"booleanValue": true})), json!(true));
        assert_eq!(decode_value(json!({"integerValue": "42"})), json!(42));
        assert_eq!(decode_value(json!({"doubleValue": 3.1412})), json!(3.1412));
        assert_eq!(decode_value(json!({"nullValue": null})), Value::Null);
        assert_eq!(
            decode_value(json!({"timestampValue": "2026-01-01T00:00:00Z"})),
            json!("2026-01-01T00:00:00Z")
        );
    }

    #[test]
    fn nested_values_decode() {
        let typed = json!({
            "mapValue": {"fields": {
                "tags": {"arrayValue": {"values": [{"stringValue": "medical"}, {"integerValue": "2"}]}},
                "office": {"geoPointValue": {"latitude": 3.1, "longitude": 101.6}}
            }}
        });
        assert_eq!(
            decode_value(typed),
            json!({
                "tags": ["medical", 2],
                "office": {"latitude": 3.1, "longitude": 101.6}
            })
        );
    }

    #[test]
    fn empty_containers_decode() {
        assert_eq!(decode_value(json!({"arrayValue": {}})), json!([]));
        assert_eq!(decode_value(json!({"mapValue": {}})), json!({}));
    }

    #[test]
    fn listing_without_documents_is_empty() {
        let page: ListDocumentsResponse = serde_json::from_value(json!({})).unwrap();
        assert!(page.documents.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn document_fields_become_a_record() {
        let page: ListDocumentsResponse = serde_json::from_value(json!({
            "documents": [{
                "name": "projects/p/databases/(default)/documents/resources/abc",
                "fields": {
                    "name": {"stringValue": "Sumbangan Tunai Rahmah"},
                    "application_url": {"stringValue": "https://bantuan.example.my"}
                },
                "createTime": "2026-01-01T00:00:00Z"
            }],
            "nextPageToken": "next"
        }))
        .unwrap();
        let record = decode_fields(page.documents.into_iter().next().unwrap().fields);
        assert_eq!(
            record,
            json!({"name": "Sumbangan Tunai Rahmah", "application_url": "https://bantuan.example.my"})
        );
        assert_eq!(page.next_page_token.as_deref(), Some("next"));
    }

    #[test]
    fn list_url_carries_paging_and_key() {
        let config = Config::from_lookup(|name| match name {
            "FIREBASE_PROJECT_ID" => Some("bantu-ai".to_string()),
            "FIREBASE_API_KEY" => Some("k".to_string()),
            "FIRESTORE_API_BASE" => Some("http://localhost:8080/".to_string()),
            _ => None,
        })
        .unwrap();
        let catalog = FirestoreCatalog::new(Client::new(), &config);
        assert_eq!(
            catalog.list_url("bantu-ai", Some("tok en")),
            "http://localhost:8080/v1/projects/bantu-ai/databases/(default)/documents/resources?pageSize=300&pageToken=tok%20en&key=k"
        );
    }

    #[tokio::test]
    async fn missing_project_fails_without_network() {
        let config = Config::from_lookup(|_| None).unwrap();
        let catalog = FirestoreCatalog::new(Client::new(), &config);
        let err = catalog.fetch_all().await.unwrap_err();
        assert!(err.to_string().contains("FIREBASE_PROJECT_ID"));
    }
}
