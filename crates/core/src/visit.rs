//! Visit record wire types.
//!
//! Field names here are the storage contract shared with the remote table
//! and with the external feedback writer; they must not be renamed.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::CoreError;
use crate::types::{null_as_empty, store_timestamp, RecordId, Timestamp};

/// Remote table holding visit records.
pub const VISITS_TABLE: &str = "visits";

/// Column used to order the visit history.
pub const CREATED_AT_COLUMN: &str = "created_at";

/// Default `visit_type` sent with every record.
pub const DEFAULT_VISIT_TYPE: &str = "既存先";

/// A persisted visit record as returned by the store.
///
/// `id` and `created_at` are assigned by the store. `ai_feedback` is written
/// out of band after insert and may be absent for any record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitRecord {
    pub id: RecordId,
    #[serde(deserialize_with = "store_timestamp")]
    pub created_at: Timestamp,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub staff_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub customer_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sub_category: String,
    #[serde(default)]
    pub visit_type: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub item_1: Option<String>,
    #[serde(default)]
    pub item_2: Option<String>,
    #[serde(default)]
    pub item_3: Option<String>,
    #[serde(default)]
    pub item_4: Option<String>,
    #[serde(default)]
    pub ai_feedback: Option<String>,
}

impl VisitRecord {
    /// Build the stored form of `visit` with store-assigned fields.
    pub fn from_new(id: RecordId, created_at: Timestamp, visit: &NewVisit) -> Self {
        Self {
            id,
            created_at,
            staff_name: visit.staff_name.clone(),
            customer_name: visit.customer_name.clone(),
            category: visit.category.clone(),
            sub_category: visit.sub_category.clone(),
            visit_type: Some(visit.visit_type.clone()),
            content: Some(visit.content.clone()),
            item_1: Some(visit.item_1.clone()),
            item_2: Some(visit.item_2.clone()),
            item_3: Some(visit.item_3.clone()),
            item_4: Some(visit.item_4.clone()),
            ai_feedback: None,
        }
    }

    /// Item values in slot order, absent values as empty strings.
    pub fn items(&self) -> [&str; 4] {
        [
            self.item_1.as_deref().unwrap_or_default(),
            self.item_2.as_deref().unwrap_or_default(),
            self.item_3.as_deref().unwrap_or_default(),
            self.item_4.as_deref().unwrap_or_default(),
        ]
    }

    /// Feedback text if the external writer has filled it in.
    pub fn feedback(&self) -> Option<&str> {
        self.ai_feedback.as_deref().filter(|f| !f.is_empty())
    }
}

/// Insert payload for a new visit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewVisit {
    #[validate(custom(function = "not_blank", message = "staff_name is required"))]
    pub staff_name: String,
    #[validate(custom(function = "not_blank", message = "customer_name is required"))]
    pub customer_name: String,
    pub category: String,
    pub sub_category: String,
    pub visit_type: String,
    pub content: String,
    pub item_1: String,
    pub item_2: String,
    pub item_3: String,
    pub item_4: String,
}

impl NewVisit {
    /// Check required fields, flattening `validator` output into one message.
    pub fn check_required(&self) -> Result<(), CoreError> {
        self.validate()
            .map_err(|errors| CoreError::Validation(validation_message(&errors)))
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

/// Render `validator` errors as their messages, sorted and joined with `; `.
pub fn validation_message(errors: &validator::ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => msg.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect();
    parts.sort();
    parts.join("; ")
}
