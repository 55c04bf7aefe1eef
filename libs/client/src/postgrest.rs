//! Table access via the REST (PostgREST) surface.
//!
//! [`SupabaseClient::table`](crate::SupabaseClient::table) returns a
//! [`QueryBuilder`]; nothing is sent until [`QueryBuilder::execute`] (or
//! [`QueryBuilder::execute_json`]) runs the request.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::client::SupabaseClient;
use crate::error::{Result, decode_json};

/// Builder for one request against `/rest/v1/{table}`.
///
/// Filters and modifiers are encoded as PostgREST query parameters
/// (`column=op.value`); mutations ask the backend to return the affected
/// rows so every execution path has a decodable body.
#[derive(Clone, Debug)]
pub struct QueryBuilder {
    inner: SupabaseClient,
    table: String,
    method: Method,
    params: Vec<(String, String)>,
    headers: Vec<(&'static str, String)>,
    body: Option<Value>,
    token: Option<String>,
}

impl QueryBuilder {
    pub(crate) fn new(inner: SupabaseClient, table: impl Into<String>) -> Self {
        Self {
            inner,
            table: table.into(),
            method: Method::GET,
            params: Vec::new(),
            headers: Vec::new(),
            body: None,
            token: None,
        }
    }

    // =========================================================================
    // Verbs
    // =========================================================================

    /// Select `columns` (PostgREST syntax, e.g. `"*"` or `"id,name"`).
    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.method = Method::GET;
        self.params.push(("select".to_string(), columns.into()));
        self
    }

    /// Insert one row or an array of rows.
    pub fn insert(mut self, rows: Value) -> Self {
        self.method = Method::POST;
        self.headers.push(("Prefer", "return=representation".to_string()));
        self.body = Some(rows);
        self
    }

    /// Insert, merging with existing rows on conflict.
    pub fn upsert(mut self, rows: Value) -> Self {
        self.method = Method::POST;
        self.headers.push((
            "Prefer",
            "resolution=merge-duplicates,return=representation".to_string(),
        ));
        self.body = Some(rows);
        self
    }

    /// Update the rows matched by the filters.
    pub fn update(mut self, changes: Value) -> Self {
        self.method = Method::PATCH;
        self.headers.push(("Prefer", "return=representation".to_string()));
        self.body = Some(changes);
        self
    }

    /// Delete the rows matched by the filters.
    pub fn delete(mut self) -> Self {
        self.method = Method::DELETE;
        self.headers.push(("Prefer", "return=representation".to_string()));
        self
    }

    // =========================================================================
    // Filters
    // =========================================================================

    fn push_filter(mut self, column: impl Into<String>, op: &str, value: impl ToString) -> Self {
        self.params
            .push((column.into(), format!("{op}.{}", value.to_string())));
        self
    }

    /// `column = value`
    pub fn eq(self, column: impl Into<String>, value: impl ToString) -> Self {
        self.push_filter(column, "eq", value)
    }

    /// `column != value`
    pub fn neq(self, column: impl Into<String>, value: impl ToString) -> Self {
        self.push_filter(column, "neq", value)
    }

    /// `column > value`
    pub fn gt(self, column: impl Into<String>, value: impl ToString) -> Self {
        self.push_filter(column, "gt", value)
    }

    /// `column >= value`
    pub fn gte(self, column: impl Into<String>, value: impl ToString) -> Self {
        self.push_filter(column, "gte", value)
    }

    /// `column < value`
    pub fn lt(self, column: impl Into<String>, value: impl ToString) -> Self {
        self.push_filter(column, "lt", value)
    }

    /// `column <= value`
    pub fn lte(self, column: impl Into<String>, value: impl ToString) -> Self {
        self.push_filter(column, "lte", value)
    }

    /// SQL `LIKE` with `%` wildcards.
    pub fn like(self, column: impl Into<String>, pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        self.push_filter(column, "like", pattern)
    }

    /// Case-insensitive `LIKE`.
    pub fn ilike(self, column: impl Into<String>, pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        self.push_filter(column, "ilike", pattern)
    }

    /// `IS` check, for `null` / `true` / `false`.
    pub fn is(self, column: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        self.push_filter(column, "is", value)
    }

    /// `column IN (values)`
    pub fn in_<I, V>(mut self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        let list = values
            .into_iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.params.push((column.into(), format!("in.({list})")));
        self
    }

    // =========================================================================
    // Modifiers
    // =========================================================================

    /// Order results by `column`.
    pub fn order(mut self, column: impl Into<String>, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.params
            .push(("order".to_string(), format!("{}.{direction}", column.into())));
        self
    }

    /// Return at most `count` rows.
    pub fn limit(mut self, count: usize) -> Self {
        self.params.push(("limit".to_string(), count.to_string()));
        self
    }

    /// Skip the first `count` rows.
    pub fn offset(mut self, count: usize) -> Self {
        self.params.push(("offset".to_string(), count.to_string()));
        self
    }

    /// Ask for exactly one row, decoded as an object rather than an array.
    pub fn single(mut self) -> Self {
        self.headers
            .push(("Accept", "application/vnd.pgrst.object+json".to_string()));
        self
    }

    /// Run the request on behalf of a user instead of the service key.
    pub fn auth(mut self, access_token: impl Into<String>) -> Self {
        self.token = Some(access_token.into());
        self
    }

    // =========================================================================
    // Execution
    // =========================================================================

    /// Execute and decode the response into `T`.
    pub async fn execute<T: DeserializeOwned>(self) -> Result<T> {
        let Self {
            inner,
            table,
            method,
            params,
            headers,
            body,
            token,
        } = self;

        let url = inner.endpoint(&format!("/rest/v1/{table}"));
        debug!(%table, %method, "rest: execute query");

        let mut request = inner.http().request(method, &url).query(&params);
        for (name, value) in &headers {
            request = request.header(*name, value.as_str());
        }
        if let Some(token) = &token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await?;
        decode_json(response).await
    }

    /// Execute and return the raw JSON value, for rows whose shape the
    /// caller does not want to model.
    pub async fn execute_json(self) -> Result<Value> {
        self.execute().await
    }
}
