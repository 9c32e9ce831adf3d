use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// `{ "data": ... }` wrapper the backend puts around every successful read.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
    #[serde(default)]
    pub message: Option<String>,
}

/// Unwrap a list envelope without failing.
///
/// A body with no `data` array is treated as an empty collection. Items that
/// do not match `T` are dropped one by one, so a single bad record never
/// hides the rest of the list.
pub fn unwrap_list<T: DeserializeOwned>(body: Value, resource: &str) -> Vec<T> {
    let items = match serde_json::from_value::<ApiResponse<Vec<Value>>>(body) {
        Ok(envelope) => envelope.data,
        Err(e) => {
            tracing::warn!(resource, error = %e, "malformed list envelope, using empty list");
            return Vec::new();
        }
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(resource, index, error = %e, "dropping malformed list item");
                None
            }
        })
        .collect()
}

/// Unwrap a single-item envelope; unlike lists, a bad shape is an error.
pub fn unwrap_one<T: DeserializeOwned>(body: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value::<ApiResponse<T>>(body).map(|envelope| envelope.data)
}
