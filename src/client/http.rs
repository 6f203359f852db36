//! Blocking HTTP implementation of the Raindrop.io API.

use super::CollectionSource;
use crate::config::RaindropConfig;
use crate::models::response::{
    ItemResponse, ItemsResponse, ModifiedResponse, StatItem, UserResponse,
};
use crate::models::{
    ALL_COLLECTION_ID, CollectionId, CollectionItem, CollectionPayload, Group, RaindropCreate,
    RaindropId, RaindropItem, RaindropQuery, RaindropUpdate, RaindropsUpdate, TRASH_COLLECTION_ID,
    Tag, User, is_system_collection, parse_hint,
};
use crate::{Error, Result};
use reqwest::Method;
use reqwest::blocking::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde_json::{Value, json};
use std::time::Instant;
use tracing::info_span;

/// Envelope fields present on every API response.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default = "default_result")]
    result: bool,
    #[serde(rename = "errorMessage", default)]
    error_message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

const fn default_result() -> bool {
    true
}

/// Raindrop.io REST client.
///
/// Every request carries `Authorization: Bearer <token>`. There is no retry
/// and no caching: each call maps to exactly one request, except permanent
/// deletes which need a second request against the trash.
#[derive(Debug, Clone)]
pub struct RaindropClient {
    /// Base URL without trailing slash.
    base_url: String,
    /// Access token.
    token: SecretString,
    /// HTTP client.
    client: reqwest::blocking::Client,
}

impl RaindropClient {
    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if no access token is configured, or
    /// [`Error::OperationFailed`] if the HTTP client cannot be built.
    pub fn new(config: &RaindropConfig) -> Result<Self> {
        let token = config
            .access_token
            .clone()
            .filter(|t| !t.expose_secret().trim().is_empty())
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "access token not configured (set {})",
                    crate::config::ENV_ACCESS_TOKEN
                ))
            })?;

        let mut builder = reqwest::blocking::Client::builder()
            .user_agent(concat!("raindrop-mcp/", env!("CARGO_PKG_VERSION")));
        if !config.timeout.is_zero() {
            builder = builder.timeout(config.timeout);
        }
        let client = builder.build().map_err(|e| Error::OperationFailed {
            operation: "build_http_client".to_string(),
            cause: e.to_string(),
        })?;

        Ok(Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token,
            client,
        })
    }

    /// Returns the API base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // User

    /// Fetches the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is invalid.
    pub fn user(&self) -> Result<User> {
        let body: UserResponse = self.execute("get_user", self.endpoint(Method::GET, "user"))?;
        Ok(body.user)
    }

    /// Finds the first group whose title equals `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the user cannot be fetched.
    pub fn group(&self, name: &str) -> Result<Option<Group>> {
        Ok(self.user()?.groups.into_iter().find(|g| g.title == name))
    }

    /// Counts raindrops in a collection.
    ///
    /// System collections are counted from `user/stats`; regular collections
    /// report their own `count`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is invalid.
    pub fn total_raindrops(&self, collection_id: CollectionId) -> Result<u64> {
        if !is_system_collection(collection_id) {
            return Ok(self.collection(collection_id)?.count.unwrap_or(0));
        }

        let stats: ItemsResponse<StatItem> =
            self.execute("get_user_stats", self.endpoint(Method::GET, "user/stats"))?;
        Ok(stats
            .items
            .iter()
            .find(|s| s.id == collection_id)
            .map_or(0, |s| s.count))
    }

    // Collections

    /// Fetches one collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is invalid.
    pub fn collection(&self, id: CollectionId) -> Result<CollectionItem> {
        let body: ItemResponse<CollectionItem> = self.execute(
            "get_collection",
            self.endpoint(Method::GET, &format!("collection/{id}")),
        )?;
        Ok(body.item)
    }

    /// Creates a collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is invalid.
    pub fn create_collection(&self, payload: &CollectionPayload) -> Result<CollectionItem> {
        let body: ItemResponse<CollectionItem> = self.execute(
            "create_collection",
            self.endpoint(Method::POST, "collection").json(payload),
        )?;
        Ok(body.item)
    }

    /// Updates a collection. Only the fields set in `payload` change.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is invalid.
    pub fn update_collection(
        &self,
        id: CollectionId,
        payload: &CollectionPayload,
    ) -> Result<CollectionItem> {
        let body: ItemResponse<CollectionItem> = self.execute(
            "update_collection",
            self.endpoint(Method::PUT, &format!("collection/{id}"))
                .json(payload),
        )?;
        Ok(body.item)
    }

    /// Deletes a collection. Its raindrops move to the trash.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn delete_collection(&self, id: CollectionId) -> Result<()> {
        let _: IgnoredAny = self.execute(
            "delete_collection",
            self.endpoint(Method::DELETE, &format!("collection/{id}")),
        )?;
        Ok(())
    }

    /// Deletes several collections and returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn delete_collections(&self, ids: &[CollectionId]) -> Result<u64> {
        let body: ModifiedResponse = self.execute(
            "delete_collections",
            self.endpoint(Method::DELETE, "collections")
                .json(&json!({ "ids": ids })),
        )?;
        Ok(body.modified)
    }

    // Raindrops

    /// Fetches one raindrop.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is invalid.
    pub fn raindrop(&self, id: RaindropId) -> Result<RaindropItem> {
        let body: ItemResponse<RaindropItem> = self.execute(
            "get_raindrop",
            self.endpoint(Method::GET, &format!("raindrop/{id}")),
        )?;
        Ok(body.item)
    }

    /// Lists raindrops of a collection (`0` for all, `-1` unsorted, `-99` trash).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is invalid.
    pub fn raindrops(
        &self,
        collection_id: CollectionId,
        query: &RaindropQuery,
    ) -> Result<Vec<RaindropItem>> {
        let body: ItemsResponse<RaindropItem> = self.execute(
            "get_raindrops",
            self.endpoint(Method::GET, &format!("raindrops/{collection_id}"))
                .query(&query.to_params()),
        )?;
        Ok(body.items)
    }

    /// Saves a new raindrop.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is invalid.
    pub fn create_raindrop(&self, raindrop: &RaindropCreate) -> Result<RaindropItem> {
        let body: ItemResponse<RaindropItem> = self.execute(
            "create_raindrop",
            self.endpoint(Method::POST, "raindrop").json(raindrop),
        )?;
        Ok(body.item)
    }

    /// Updates a raindrop. A changed link is re-parsed by the API.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is invalid.
    pub fn update_raindrop(&self, id: RaindropId, update: &RaindropUpdate) -> Result<RaindropItem> {
        let mut update = update.clone();
        if update.link.is_some() && update.please_parse.is_none() {
            update.please_parse = Some(parse_hint());
        }

        let body: ItemResponse<RaindropItem> = self.execute(
            "update_raindrop",
            self.endpoint(Method::PUT, &format!("raindrop/{id}"))
                .json(&update),
        )?;
        Ok(body.item)
    }

    /// Updates raindrops of a collection in bulk and returns the modified count.
    ///
    /// `nested` only takes effect together with `search`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is invalid.
    pub fn update_raindrops(
        &self,
        collection_id: CollectionId,
        update: &RaindropsUpdate,
        nested: bool,
        search: Option<&str>,
    ) -> Result<u64> {
        let body: ModifiedResponse = self.execute(
            "update_raindrops",
            self.endpoint(Method::PUT, &format!("raindrops/{collection_id}"))
                .query(&search_params(search, nested))
                .json(update),
        )?;
        Ok(body.modified)
    }

    /// Deletes a raindrop.
    ///
    /// The first delete moves it to the trash; with `permanent` a second
    /// delete removes it from the trash.
    ///
    /// # Errors
    ///
    /// Returns an error if either request fails.
    pub fn delete_raindrop(&self, id: RaindropId, permanent: bool) -> Result<()> {
        let path = format!("raindrop/{id}");
        let _: IgnoredAny = self.execute("delete_raindrop", self.endpoint(Method::DELETE, &path))?;
        if permanent {
            let _: IgnoredAny =
                self.execute("purge_raindrop", self.endpoint(Method::DELETE, &path))?;
        }
        Ok(())
    }

    /// Deletes raindrops of a collection, filtered by `search` and/or `ids`.
    ///
    /// With `permanent` the same request is replayed against the trash.
    /// Returns the modified count of the last request.
    ///
    /// # Errors
    ///
    /// Returns an error if either request fails.
    pub fn delete_raindrops(
        &self,
        collection_id: CollectionId,
        search: Option<&str>,
        ids: Option<&[RaindropId]>,
        permanent: bool,
    ) -> Result<u64> {
        let params = search_params(search, false);
        let payload = match ids.filter(|ids| !ids.is_empty()) {
            Some(ids) => json!({ "ids": ids }),
            None => json!({}),
        };

        let body: ModifiedResponse = self.execute(
            "delete_raindrops",
            self.endpoint(Method::DELETE, &format!("raindrops/{collection_id}"))
                .query(&params)
                .json(&payload),
        )?;
        if !permanent || collection_id == TRASH_COLLECTION_ID {
            return Ok(body.modified);
        }

        let body: ModifiedResponse = self.execute(
            "purge_raindrops",
            self.endpoint(Method::DELETE, &format!("raindrops/{TRASH_COLLECTION_ID}"))
                .query(&params)
                .json(&payload),
        )?;
        Ok(body.modified)
    }

    // Tags

    /// Lists tags, across all collections for `0`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is invalid.
    pub fn tags(&self, collection_id: CollectionId) -> Result<Vec<Tag>> {
        let body: ItemsResponse<Tag> = self.execute(
            "get_tags",
            self.endpoint(Method::GET, &tags_path(collection_id)),
        )?;
        Ok(body.items)
    }

    /// Renames a tag.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn rename_tag(&self, tag: &str, new_name: &str, collection_id: CollectionId) -> Result<()> {
        let _: IgnoredAny = self.execute(
            "rename_tag",
            self.endpoint(Method::PUT, &tags_path(collection_id))
                .json(&json!({ "replace": new_name, "tags": [tag] })),
        )?;
        Ok(())
    }

    /// Merges several tags into one.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn merge_tags(
        &self,
        tags: &[String],
        new_name: &str,
        collection_id: CollectionId,
    ) -> Result<()> {
        let _: IgnoredAny = self.execute(
            "merge_tags",
            self.endpoint(Method::PUT, &tags_path(collection_id))
                .json(&json!({ "tags": tags, "replace": new_name })),
        )?;
        Ok(())
    }

    /// Removes tags from every raindrop carrying them.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn delete_tags(&self, tags: &[String], collection_id: CollectionId) -> Result<()> {
        let _: IgnoredAny = self.execute(
            "delete_tags",
            self.endpoint(Method::DELETE, &tags_path(collection_id))
                .json(&json!({ "tags": tags })),
        )?;
        Ok(())
    }

    fn fetch_collections(&self, operation: &'static str, path: &str) -> Result<Vec<CollectionItem>> {
        let body: ItemsResponse<CollectionItem> =
            self.execute(operation, self.endpoint(Method::GET, path))?;
        Ok(body.items)
    }

    fn endpoint(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/{path}", self.base_url))
            .bearer_auth(self.token.expose_secret())
    }

    /// Sends a request and decodes the response body.
    fn execute<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T> {
        let span = info_span!("raindrop.request", operation, status = tracing::field::Empty);
        let _enter = span.enter();
        let start = Instant::now();

        let result = send(operation, request);

        let status_label = match &result {
            Ok(_) => "success",
            Err(Error::Unauthorized(_)) => "unauthorized",
            Err(Error::Api { .. }) => "api_error",
            Err(_) => "error",
        };
        span.record("status", status_label);
        metrics::counter!(
            "raindrop_api_requests_total",
            "operation" => operation,
            "status" => status_label
        )
        .increment(1);
        metrics::histogram!("raindrop_api_request_duration_ms", "operation" => operation)
            .record(start.elapsed().as_secs_f64() * 1000.0);

        match &result {
            Ok(_) => tracing::debug!(
                duration_ms = start.elapsed().as_millis(),
                "Raindrop request completed"
            ),
            Err(e) => tracing::warn!(error = %e, "Raindrop request failed"),
        }

        result
    }
}

impl CollectionSource for RaindropClient {
    fn root_collections(&self) -> Result<Vec<CollectionItem>> {
        self.fetch_collections("get_root_collections", "collections")
    }

    fn child_collections(&self) -> Result<Vec<CollectionItem>> {
        self.fetch_collections("get_child_collections", "collections/childrens")
    }

    fn all_collections(&self) -> Result<Vec<CollectionItem>> {
        self.fetch_collections("get_all_collections", "collections/all")
    }

    fn groups(&self) -> Result<Vec<Group>> {
        Ok(self.user()?.groups)
    }
}

fn send<T: DeserializeOwned>(operation: &'static str, request: RequestBuilder) -> Result<T> {
    let response = request.send().map_err(|e| Error::OperationFailed {
        operation: operation.to_string(),
        cause: e.to_string(),
    })?;

    let status = response.status();
    let text = response.text().map_err(|e| Error::OperationFailed {
        operation: operation.to_string(),
        cause: e.to_string(),
    })?;

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(Error::Unauthorized(format!(
            "{operation}: {}",
            error_message(&text, status)
        )));
    }
    if !status.is_success() {
        return Err(Error::Api {
            operation: operation.to_string(),
            status: status.as_u16(),
            message: error_message(&text, status),
        });
    }

    let value: Value = serde_json::from_str(&text).map_err(|e| Error::OperationFailed {
        operation: operation.to_string(),
        cause: format!("invalid JSON response: {e}"),
    })?;

    let envelope = Envelope::deserialize(&value).map_err(|e| Error::OperationFailed {
        operation: operation.to_string(),
        cause: format!("invalid response envelope: {e}"),
    })?;
    if !envelope.result {
        return Err(Error::Api {
            operation: operation.to_string(),
            status: status.as_u16(),
            message: envelope
                .error_message
                .or(envelope.error)
                .unwrap_or_else(|| "request rejected".to_string()),
        });
    }

    T::deserialize(value).map_err(|e| Error::OperationFailed {
        operation: operation.to_string(),
        cause: format!("unexpected response body: {e}"),
    })
}

/// Extracts a readable message from an error body.
fn error_message(body: &str, status: reqwest::StatusCode) -> String {
    if let Ok(envelope) = serde_json::from_str::<Envelope>(body) {
        if let Some(message) = envelope.error_message.or(envelope.error) {
            return message;
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        trimmed.to_string()
    }
}

/// Query for bulk endpoints: sent only when a search filter is present.
fn search_params(search: Option<&str>, nested: bool) -> Vec<(&'static str, String)> {
    match search.filter(|s| !s.trim().is_empty()) {
        Some(search) => vec![("search", search.to_string()), ("nested", nested.to_string())],
        None => Vec::new(),
    }
}

fn tags_path(collection_id: CollectionId) -> String {
    if collection_id == ALL_COLLECTION_ID {
        "tags".to_string()
    } else {
        format!("tags/{collection_id}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_token() {
        let result = RaindropClient::new(&RaindropConfig::default());
        assert!(matches!(result, Err(Error::InvalidInput(_))));

        let blank = RaindropConfig::default().with_access_token("   ");
        assert!(matches!(RaindropClient::new(&blank), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_new_trims_base_url() {
        let config = RaindropConfig::default()
            .with_access_token("token")
            .with_api_url("http://localhost:1/rest/v1/");
        let client = RaindropClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:1/rest/v1");
    }

    #[test]
    fn test_debug_hides_token() {
        let config = RaindropConfig::default().with_access_token("very-secret-token");
        let client = RaindropClient::new(&config).unwrap();
        assert!(!format!("{client:?}").contains("very-secret-token"));
    }

    #[test]
    fn test_error_message_prefers_payload() {
        let status = reqwest::StatusCode::NOT_FOUND;
        assert_eq!(
            error_message(r#"{"result": false, "errorMessage": "Not found"}"#, status),
            "Not found"
        );
        assert_eq!(
            error_message(r#"{"result": false, "error": "bad"}"#, status),
            "bad"
        );
        assert_eq!(error_message("gateway down", status), "gateway down");
        assert_eq!(error_message("", status), "Not Found");
    }

    #[test]
    fn test_search_params() {
        assert!(search_params(None, true).is_empty());
        assert!(search_params(Some(" "), true).is_empty());
        assert_eq!(
            search_params(Some("#rust"), true),
            vec![("search", "#rust".to_string()), ("nested", "true".to_string())]
        );
    }

    #[test]
    fn test_tags_path() {
        assert_eq!(tags_path(0), "tags");
        assert_eq!(tags_path(42), "tags/42");
        assert_eq!(tags_path(-1), "tags/-1");
    }
}
