//! Wire types shared by every client of the fleet HTTP API.
//!
//! The backend speaks camelCase JSON; every request/response body lives here
//! so the client crates never hand-build JSON.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod auth {
    use super::*;

    /// Opaque bearer credential returned by `/auth/login`.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Token(String);

    impl Token {
        pub fn new(raw: impl Into<String>) -> Self {
            Self(raw.into())
        }

        pub fn as_str(&self) -> &str {
            &self.0
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginRequest {
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginResponse {
        pub token: Token,
        pub user: UserView,
    }

    /// Profile of the authenticated user.
    ///
    /// `role` is kept as the raw server string: unknown values must degrade
    /// to "not authenticated" on the client, never to a default role.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UserView {
        pub id: Uuid,
        pub name: String,
        pub email: String,
        pub role: String,
        pub is_active: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SignupRequest {
        pub name: String,
        pub email: String,
        pub password: String,
        pub role: String,
    }
}

pub mod filter {
    use super::*;

    /// Filter set forwarded verbatim as query parameters.
    ///
    /// Filtering is server-side; the client never post-filters a collection
    /// beyond the kind filter applied at aggregation time.
    #[derive(Clone, Debug, Default, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CollectionFilters {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub driver_id: Option<Uuid>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub vehicle_id: Option<Uuid>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub category: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub from: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub to: Option<String>,
    }

    impl CollectionFilters {
        pub fn for_driver(driver_id: Uuid) -> Self {
            Self {
                driver_id: Some(driver_id),
                ..Self::default()
            }
        }
    }
}

pub mod record {
    use super::*;

    /// Raw earning row as the server returns it.
    ///
    /// `amount` arrives as number, numeric string or null depending on the
    /// backend code path; `date` may be absent or unparsable. Both are
    /// normalized by the aggregation layer, not here.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RawEarning {
        pub id: Uuid,
        #[serde(default)]
        pub amount: Option<serde_json::Value>,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default)]
        pub note: Option<String>,
        #[serde(default)]
        pub date: Option<String>,
        #[serde(default)]
        pub category: Option<String>,
        #[serde(default)]
        pub driver_id: Option<Uuid>,
        #[serde(default)]
        pub vehicle_id: Option<Uuid>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RawExpense {
        pub id: Uuid,
        #[serde(default)]
        pub amount: Option<serde_json::Value>,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default)]
        pub note: Option<String>,
        #[serde(default)]
        pub date: Option<String>,
        /// Expense type tag ("fuel", "maintenance", ...).
        #[serde(default, rename = "type")]
        pub expense_type: Option<String>,
        #[serde(default)]
        pub driver_id: Option<Uuid>,
        #[serde(default)]
        pub vehicle_id: Option<Uuid>,
    }

    /// Vehicle-attached recurring expense (insurance, road tax, leasing).
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RawAutoExpense {
        pub id: Uuid,
        #[serde(default)]
        pub amount: Option<serde_json::Value>,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default)]
        pub note: Option<String>,
        #[serde(default)]
        pub date: Option<String>,
        #[serde(default)]
        pub category: Option<String>,
        #[serde(default)]
        pub vehicle_id: Option<Uuid>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Vehicle {
        pub id: Uuid,
        pub plate: String,
        #[serde(default)]
        pub model: Option<String>,
        #[serde(default)]
        pub driver_id: Option<Uuid>,
        #[serde(default)]
        pub active: bool,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Driver {
        pub id: Uuid,
        pub name: String,
        #[serde(default)]
        pub email: Option<String>,
        #[serde(default)]
        pub vehicle_id: Option<Uuid>,
        #[serde(default)]
        pub active: bool,
    }
}

pub mod envelope {
    use std::collections::HashMap;

    use super::*;

    /// Collection responses come in three shapes depending on the endpoint
    /// generation: a bare array, `{"data": [...]}`, or `{"<kind>": [...]}`.
    /// Downstream code always wants a flat list.
    #[derive(Debug, Deserialize)]
    #[serde(untagged)]
    pub enum ListEnvelope<T> {
        Bare(Vec<T>),
        Data { data: Vec<T> },
        Keyed(HashMap<String, Vec<T>>),
    }

    impl<T> ListEnvelope<T> {
        /// Flattens the envelope into the inner list.
        pub fn into_items(self) -> Vec<T> {
            match self {
                Self::Bare(items) => items,
                Self::Data { data } => data,
                Self::Keyed(map) => map.into_values().next().unwrap_or_default(),
            }
        }
    }
}

pub mod error {
    use super::*;

    /// Error body the server attaches to non-2xx responses.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ErrorBody {
        pub error: String,
    }
}

#[cfg(test)]
mod tests {
    use super::envelope::ListEnvelope;
    use super::record::RawEarning;

    #[test]
    fn envelope_accepts_bare_array() {
        let body = r#"[{"id":"7b0f8f9e-9f0b-4f46-93d7-0c2a8c9f1a01"}]"#;
        let parsed: ListEnvelope<RawEarning> = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.into_items().len(), 1);
    }

    #[test]
    fn envelope_accepts_data_wrapper() {
        let body = r#"{"data":[{"id":"7b0f8f9e-9f0b-4f46-93d7-0c2a8c9f1a01"}]}"#;
        let parsed: ListEnvelope<RawEarning> = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.into_items().len(), 1);
    }

    #[test]
    fn envelope_accepts_kind_keyed_wrapper() {
        let body = r#"{"earnings":[{"id":"7b0f8f9e-9f0b-4f46-93d7-0c2a8c9f1a01"}]}"#;
        let parsed: ListEnvelope<RawEarning> = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.into_items().len(), 1);
    }
}
