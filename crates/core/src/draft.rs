//! Client-side visit draft.
//!
//! A [`FormDraft`] holds the values being typed into the form before they
//! are submitted. The selected sub-category is the single source of truth
//! for the selection; the category is derived from it, so the pair can never
//! disagree.

use std::str::FromStr;

use serde::Serialize;

use crate::error::CoreError;
use crate::schema::{Category, ItemLabels, SubCategory};
use crate::visit::{NewVisit, DEFAULT_VISIT_TYPE};

// ---------------------------------------------------------------------------
// DraftField
// ---------------------------------------------------------------------------

/// An editable field of the draft, addressed by its wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    StaffName,
    CustomerName,
    Category,
    SubCategory,
    VisitType,
    Content,
    Item1,
    Item2,
    Item3,
    Item4,
}

impl DraftField {
    pub const ALL: [DraftField; 10] = [
        DraftField::StaffName,
        DraftField::CustomerName,
        DraftField::Category,
        DraftField::SubCategory,
        DraftField::VisitType,
        DraftField::Content,
        DraftField::Item1,
        DraftField::Item2,
        DraftField::Item3,
        DraftField::Item4,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DraftField::StaffName => "staff_name",
            DraftField::CustomerName => "customer_name",
            DraftField::Category => "category",
            DraftField::SubCategory => "sub_category",
            DraftField::VisitType => "visit_type",
            DraftField::Content => "content",
            DraftField::Item1 => "item_1",
            DraftField::Item2 => "item_2",
            DraftField::Item3 => "item_3",
            DraftField::Item4 => "item_4",
        }
    }
}

impl FromStr for DraftField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown form field '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// ResetPolicy
// ---------------------------------------------------------------------------

/// What survives in the draft after a successful submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetPolicy {
    /// Clear the per-visit text but keep staff, category, sub-category and
    /// visit type for the next entry.
    #[default]
    KeepOperatorDefaults,
    /// Return the whole draft to its start-of-session defaults.
    FullReset,
}

impl FromStr for ResetPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "keep" | "keep_operator_defaults" => Ok(Self::KeepOperatorDefaults),
            "full" | "full_reset" => Ok(Self::FullReset),
            other => Err(CoreError::Validation(format!(
                "Invalid reset policy '{other}'. Must be one of: keep, full"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// FormDraft
// ---------------------------------------------------------------------------

/// Transient, client-owned form state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDraft {
    pub staff_name: String,
    pub customer_name: String,
    sub_category: SubCategory,
    pub visit_type: String,
    pub content: String,
    pub items: [String; 4],
}

impl Default for FormDraft {
    fn default() -> Self {
        Self {
            staff_name: String::new(),
            customer_name: String::new(),
            sub_category: SubCategory::default(),
            visit_type: DEFAULT_VISIT_TYPE.to_string(),
            content: String::new(),
            items: Default::default(),
        }
    }
}

impl FormDraft {
    pub fn category(&self) -> Category {
        self.sub_category.category()
    }

    pub fn sub_category(&self) -> SubCategory {
        self.sub_category
    }

    /// Labels for the item slots under the current selection.
    pub fn labels(&self) -> ItemLabels {
        self.sub_category.labels()
    }

    /// Switch category; the sub-category moves to the category's first entry.
    pub fn set_category(&mut self, category: Category) {
        self.sub_category = category.default_sub_category();
    }

    /// Select a sub-category by name within the current category.
    pub fn set_sub_category(&mut self, name: &str) -> Result<(), CoreError> {
        self.sub_category = SubCategory::from_name(self.category(), name)?;
        Ok(())
    }

    /// Assign one field from its textual value.
    ///
    /// Free-text fields are stored as given. `category` and `sub_category`
    /// must name valid schema entries.
    pub fn set_field(&mut self, field: DraftField, value: String) -> Result<(), CoreError> {
        match field {
            DraftField::StaffName => self.staff_name = value,
            DraftField::CustomerName => self.customer_name = value,
            DraftField::Category => self.set_category(Category::from_name(&value)?),
            DraftField::SubCategory => self.set_sub_category(&value)?,
            DraftField::VisitType => self.visit_type = value,
            DraftField::Content => self.content = value,
            DraftField::Item1 => self.items[0] = value,
            DraftField::Item2 => self.items[1] = value,
            DraftField::Item3 => self.items[2] = value,
            DraftField::Item4 => self.items[3] = value,
        }
        Ok(())
    }

    /// Read one field back as text.
    pub fn field(&self, field: DraftField) -> &str {
        match field {
            DraftField::StaffName => &self.staff_name,
            DraftField::CustomerName => &self.customer_name,
            DraftField::Category => self.category().name(),
            DraftField::SubCategory => self.sub_category.name(),
            DraftField::VisitType => &self.visit_type,
            DraftField::Content => &self.content,
            DraftField::Item1 => &self.items[0],
            DraftField::Item2 => &self.items[1],
            DraftField::Item3 => &self.items[2],
            DraftField::Item4 => &self.items[3],
        }
    }

    /// Snapshot the draft as an insert payload.
    pub fn to_new_visit(&self) -> NewVisit {
        let [item_1, item_2, item_3, item_4] = self.items.clone();
        NewVisit {
            staff_name: self.staff_name.clone(),
            customer_name: self.customer_name.clone(),
            category: self.category().name().to_string(),
            sub_category: self.sub_category.name().to_string(),
            visit_type: self.visit_type.clone(),
            content: self.content.clone(),
            item_1,
            item_2,
            item_3,
            item_4,
        }
    }

    /// Clear the draft after a successful submission.
    pub fn reset(&mut self, policy: ResetPolicy) {
        match policy {
            ResetPolicy::KeepOperatorDefaults => {
                self.customer_name.clear();
                self.content.clear();
                self.items = Default::default();
            }
            ResetPolicy::FullReset => *self = Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> FormDraft {
        let mut draft = FormDraft::default();
        draft.set_field(DraftField::StaffName, "兼次勇一".into()).unwrap();
        draft.set_field(DraftField::CustomerName, "B Corp".into()).unwrap();
        draft.set_field(DraftField::Category, "商談・見積".into()).unwrap();
        draft.set_field(DraftField::SubCategory, "見積書の提出".into()).unwrap();
        draft.set_field(DraftField::Content, "見積提出".into()).unwrap();
        draft.set_field(DraftField::Item1, "¥100,000".into()).unwrap();
        draft.set_field(DraftField::Item4, "来週".into()).unwrap();
        draft
    }

    #[test]
    fn default_draft_matches_form_start_state() {
        let draft = FormDraft::default();
        assert_eq!(draft.category().name(), "既存フォロー");
        assert_eq!(draft.sub_category().name(), "在庫確認");
        assert_eq!(draft.visit_type, "既存先");
        assert!(draft.staff_name.is_empty());
        assert!(draft.items.iter().all(String::is_empty));
    }

    #[test]
    fn changing_category_resets_sub_category_to_first_member() {
        let mut draft = FormDraft::default();
        for category in Category::ALL {
            draft.set_category(category);
            assert_eq!(draft.category(), category);
            assert_eq!(draft.sub_category(), category.sub_categories()[0]);
        }
    }

    #[test]
    fn sub_category_outside_current_category_is_rejected() {
        let mut draft = FormDraft::default();
        let err = draft.set_sub_category("見積書の提出").unwrap_err();
        assert!(matches!(err, CoreError::UnknownSubcategory { .. }));
        assert_eq!(draft.sub_category().name(), "在庫確認");
    }

    #[test]
    fn unknown_category_leaves_selection_untouched() {
        let mut draft = filled();
        assert!(draft.set_field(DraftField::Category, "雑談".into()).is_err());
        assert_eq!(draft.sub_category().name(), "見積書の提出");
    }

    #[test]
    fn field_names_round_trip_through_from_str() {
        for field in DraftField::ALL {
            assert_eq!(field.name().parse::<DraftField>().unwrap(), field);
        }
        assert!("ai_feedback".parse::<DraftField>().is_err());
    }

    #[test]
    fn labels_follow_selection() {
        let draft = filled();
        assert_eq!(draft.labels()[0], "見積金額");
    }

    #[test]
    fn new_visit_snapshot_carries_blank_items() {
        let visit = filled().to_new_visit();
        assert_eq!(visit.category, "商談・見積");
        assert_eq!(visit.sub_category, "見積書の提出");
        assert_eq!(visit.item_1, "¥100,000");
        assert_eq!(visit.item_2, "");
        assert_eq!(visit.item_3, "");
        assert_eq!(visit.item_4, "来週");
        assert_eq!(visit.visit_type, "既存先");
    }

    #[test]
    fn keep_policy_preserves_operator_defaults() {
        let mut draft = filled();
        draft.reset(ResetPolicy::KeepOperatorDefaults);
        assert_eq!(draft.staff_name, "兼次勇一");
        assert_eq!(draft.sub_category().name(), "見積書の提出");
        assert_eq!(draft.category().name(), "商談・見積");
        assert!(draft.customer_name.is_empty());
        assert!(draft.content.is_empty());
        assert!(draft.items.iter().all(String::is_empty));
    }

    #[test]
    fn full_policy_restores_defaults() {
        let mut draft = filled();
        draft.reset(ResetPolicy::FullReset);
        assert_eq!(draft, FormDraft::default());
    }

    #[test]
    fn reset_policy_parses_env_values() {
        assert_eq!("keep".parse::<ResetPolicy>().unwrap(), ResetPolicy::KeepOperatorDefaults);
        assert_eq!(" full ".parse::<ResetPolicy>().unwrap(), ResetPolicy::FullReset);
        assert!("partial".parse::<ResetPolicy>().is_err());
    }
}
