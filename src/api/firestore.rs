use super::value::{Document, Fields};
use super::{store_error_from_response, with_auth_headers};
use crate::error::{StoreError, StoreResult};
use crate::store::SortOrder;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::{Arc, RwLock};

const FIRESTORE_URL: &str = "https://firestore.googleapis.com/v1";

/// Comparison used in a structured-query field filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FieldOp {
    Equal,
    AtLeast,
    AtMost,
}

impl FieldOp {
    fn as_str(self) -> &'static str {
        match self {
            FieldOp::Equal => "EQUAL",
            FieldOp::AtLeast => "GREATER_THAN_OR_EQUAL",
            FieldOp::AtMost => "LESS_THAN_OR_EQUAL",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct FieldFilter {
    pub field: &'static str,
    pub op: FieldOp,
    pub value: Value,
}

/// Write guard sent as `currentDocument.*`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Precondition {
    None,
    Exists,
    UpdateTime(String),
}

/// Builds a `runQuery` body over one subcollection of the user document.
pub(crate) fn structured_query(
    collection: &str,
    filters: &[FieldFilter],
    order_by: Option<(&str, SortOrder)>,
) -> Value {
    let mut q = json!({ "from": [{ "collectionId": collection }] });

    let mut clauses: Vec<Value> = filters
        .iter()
        .map(|f| {
            json!({
                "fieldFilter": {
                    "field": { "fieldPath": f.field },
                    "op": f.op.as_str(),
                    "value": f.value,
                }
            })
        })
        .collect();

    match clauses.len() {
        0 => {}
        1 => q["where"] = clauses.remove(0),
        _ => q["where"] = json!({ "compositeFilter": { "op": "AND", "filters": clauses } }),
    }

    if let Some((field, order)) = order_by {
        let direction = match order {
            SortOrder::Ascending => "ASCENDING",
            SortOrder::Descending => "DESCENDING",
        };
        q["orderBy"] = json!([{ "field": { "fieldPath": field }, "direction": direction }]);
    }

    json!({ "structuredQuery": q })
}

#[derive(Deserialize, Debug)]
struct RunQueryItem {
    #[serde(default)]
    document: Option<Document>,
}

/// Documents REST client scoped to one project's default database.
///
/// The id token is shared between clones so that signing in updates every
/// holder at once.
#[derive(Clone, Debug)]
pub(crate) struct FirestoreClient {
    pub(crate) base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl FirestoreClient {
    pub fn new(project_id: &str) -> Self {
        Self {
            base_url: format!("{FIRESTORE_URL}/projects/{project_id}/databases/(default)/documents"),
            token: Arc::new(RwLock::new(None)),
        }
    }

    pub fn set_token(&self, token: Option<String>) {
        if let Ok(mut t) = self.token.write() {
            *t = token;
        }
    }

    pub(crate) fn get_auth_token(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> StoreResult<reqwest::Response> {
        let req = with_auth_headers(req, self.get_auth_token());
        let res = req.send().await.map_err(StoreError::network)?;

        if res.status().is_success() {
            Ok(res)
        } else {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            Err(store_error_from_response(status, &body))
        }
    }

    /// `parent` is the document the collection hangs off, e.g. `users/{uid}`.
    pub async fn run_query(&self, parent: &str, query: Value) -> StoreResult<Vec<Document>> {
        let client = reqwest::Client::new();
        let res = self
            .send(client.post(format!("{}:runQuery", self.url(parent))).json(&query))
            .await?;
        let items: Vec<RunQueryItem> = res.json().await.map_err(StoreError::parse)?;
        Ok(items.into_iter().filter_map(|i| i.document).collect())
    }

    pub async fn get_document(&self, path: &str) -> StoreResult<Option<Document>> {
        let client = reqwest::Client::new();
        match self.send(client.get(self.url(path))).await {
            Ok(res) => res.json().await.map(Some).map_err(StoreError::parse),
            Err(e) if e.kind == crate::error::StoreErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Creates a document with a server-assigned id.
    pub async fn create_document(&self, collection: &str, fields: Fields) -> StoreResult<Document> {
        let client = reqwest::Client::new();
        let res = self
            .send(client.post(self.url(collection)).json(&json!({ "fields": fields })))
            .await?;
        res.json().await.map_err(StoreError::parse)
    }

    /// Writes only the masked fields; other fields are kept (merge).
    pub async fn patch_document(
        &self,
        path: &str,
        fields: Fields,
        precondition: Precondition,
    ) -> StoreResult<Document> {
        let url = patch_url(&self.url(path), fields.keys().map(|k| k.as_str()), &precondition);
        let client = reqwest::Client::new();
        let res = self
            .send(client.patch(url).json(&json!({ "fields": fields })))
            .await?;
        res.json().await.map_err(StoreError::parse)
    }

    pub async fn delete_document(&self, path: &str) -> StoreResult<()> {
        let client = reqwest::Client::new();
        self.send(client.delete(self.url(path))).await?;
        Ok(())
    }
}

fn patch_url<'a>(base: &str, mask: impl Iterator<Item = &'a str>, precondition: &Precondition) -> String {
    let mut params: Vec<String> = mask
        .map(|f| format!("updateMask.fieldPaths={}", urlencoding::encode(f)))
        .collect();
    match precondition {
        Precondition::None => {}
        Precondition::Exists => params.push("currentDocument.exists=true".to_string()),
        Precondition::UpdateTime(t) => {
            params.push(format!("currentDocument.updateTime={}", urlencoding::encode(t)))
        }
    }
    if params.is_empty() {
        base.to_string()
    } else {
        format!("{base}?{}", params.join("&"))
    }
}
