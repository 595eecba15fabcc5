//! Render model for the visit history list.
//!
//! Turns stored [`VisitRecord`]s into display entries: category badge, local
//! date, customer, a short content preview, labelled item values and, when
//! the feedback writer has produced one, an annotation block.

use chrono::{FixedOffset, Offset, Utc};
use serde::Serialize;

use crate::schema::labels_or_placeholder;
use crate::types::RecordId;
use crate::visit::VisitRecord;

/// Maximum number of characters kept in the content preview.
pub const PREVIEW_MAX_CHARS: usize = 80;

/// Heading shown above the feedback annotation.
pub const ANNOTATION_TITLE: &str = "AI部長からの激励";

/// Default display offset (JST, +09:00) in minutes.
pub const DEFAULT_DISPLAY_OFFSET_MINUTES: i32 = 9 * 60;

/// One rendered history row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub id: RecordId,
    pub category: String,
    pub sub_category: String,
    pub date: String,
    pub customer_name: String,
    pub staff_name: String,
    pub content_preview: String,
    pub details: Vec<LabeledValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<Annotation>,
}

/// An item value with the label it had under the record's sub-category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledValue {
    pub label: &'static str,
    pub value: String,
}

/// Feedback block attached to a record after the fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    pub title: &'static str,
    pub body: String,
}

/// Date and timezone settings for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub offset: FixedOffset,
}

impl RenderOptions {
    /// Build from a UTC offset in minutes, falling back to JST if out of range.
    pub fn with_offset_minutes(minutes: i32) -> Self {
        let offset = FixedOffset::east_opt(minutes.saturating_mul(60))
            .or_else(|| FixedOffset::east_opt(DEFAULT_DISPLAY_OFFSET_MINUTES * 60))
            .unwrap_or_else(|| Utc.fix());
        Self { offset }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::with_offset_minutes(DEFAULT_DISPLAY_OFFSET_MINUTES)
    }
}

/// Render one record.
pub fn render_entry(record: &VisitRecord, options: &RenderOptions) -> HistoryEntry {
    let labels = labels_or_placeholder(&record.category, &record.sub_category);
    let details = labels
        .into_iter()
        .zip(record.items())
        .filter(|(_, value)| !value.is_empty())
        .map(|(label, value)| LabeledValue {
            label,
            value: value.to_string(),
        })
        .collect();

    HistoryEntry {
        id: record.id.clone(),
        category: record.category.clone(),
        sub_category: record.sub_category.clone(),
        date: record
            .created_at
            .with_timezone(&options.offset)
            .format("%Y/%m/%d")
            .to_string(),
        customer_name: record.customer_name.clone(),
        staff_name: record.staff_name.clone(),
        content_preview: preview(record.content.as_deref().unwrap_or_default()),
        details,
        annotation: record.feedback().map(|body| Annotation {
            title: ANNOTATION_TITLE,
            body: body.to_string(),
        }),
    }
}

/// Render records in the order given.
pub fn render_history(records: &[VisitRecord], options: &RenderOptions) -> Vec<HistoryEntry> {
    records.iter().map(|r| render_entry(r, options)).collect()
}

/// Truncate on character boundaries, appending an ellipsis when cut.
pub fn preview(content: &str) -> String {
    let content = content.trim();
    if content.chars().count() <= PREVIEW_MAX_CHARS {
        return content.to_string();
    }
    let mut cut: String = content.chars().take(PREVIEW_MAX_CHARS).collect();
    cut.push('…');
    cut
}
