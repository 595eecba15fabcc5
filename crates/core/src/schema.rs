//! Visit form schema: category / sub-category / item label lookup.
//!
//! The form asks for four free-text items whose meaning depends on the
//! selected (category, sub-category) pair. The mapping is closed and fixed,
//! so it is expressed as enums with exhaustive matches: every sub-category
//! belongs to exactly one category and always carries exactly four labels.
//!
//! Stored records carry the category names as plain strings, so the module
//! also offers name-based lookups and a soft fallback for pairs that no
//! longer resolve (see [`labels_or_placeholder`]).

use serde::Serialize;

use crate::error::CoreError;

/// Number of dynamic item slots on the form (`item_1..item_4`).
pub const ITEM_SLOTS: usize = 4;

/// Item labels for one sub-category.
pub type ItemLabels = [&'static str; ITEM_SLOTS];

/// Labels shown when a stored (category, sub-category) pair does not resolve.
pub const PLACEHOLDER_LABELS: ItemLabels = ["項目1", "項目2", "項目3", "項目4"];

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Top-level visit category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Category {
    #[default]
    ExistingFollowUp,
    NegotiationQuote,
    Trouble,
    SeasonalProposal,
}

impl Category {
    /// All categories in declaration order.
    pub const ALL: [Category; 4] = [
        Category::ExistingFollowUp,
        Category::NegotiationQuote,
        Category::Trouble,
        Category::SeasonalProposal,
    ];

    /// Wire name as stored in the `category` column.
    pub fn name(self) -> &'static str {
        match self {
            Category::ExistingFollowUp => "既存フォロー",
            Category::NegotiationQuote => "商談・見積",
            Category::Trouble => "トラブル",
            Category::SeasonalProposal => "季節提案",
        }
    }

    /// Parse a stored category name.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| CoreError::UnknownCategory(name.to_string()))
    }

    /// Sub-categories of this category in declaration order. Never empty.
    pub fn sub_categories(self) -> &'static [SubCategory] {
        use SubCategory::*;
        match self {
            Category::ExistingFollowUp => &[StockCheck, Delivery, ProofMeeting],
            Category::NegotiationQuote => &[QuoteSpecMeeting, QuoteSubmission, QuoteFollowUp],
            Category::Trouble => &[ComplaintAssessment, ComplaintApology],
            Category::SeasonalProposal => &[CalendarProposal, NewYearCardProposal],
        }
    }

    /// First sub-category, used whenever the category changes.
    pub fn default_sub_category(self) -> SubCategory {
        self.sub_categories()[0]
    }
}

// ---------------------------------------------------------------------------
// SubCategory
// ---------------------------------------------------------------------------

/// Second-level visit category. Each variant belongs to one [`Category`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubCategory {
    // 既存フォロー
    StockCheck,
    Delivery,
    ProofMeeting,
    // 商談・見積
    QuoteSpecMeeting,
    QuoteSubmission,
    QuoteFollowUp,
    // トラブル
    ComplaintAssessment,
    ComplaintApology,
    // 季節提案
    CalendarProposal,
    NewYearCardProposal,
}

impl SubCategory {
    /// Parent category.
    pub fn category(self) -> Category {
        use SubCategory::*;
        match self {
            StockCheck | Delivery | ProofMeeting => Category::ExistingFollowUp,
            QuoteSpecMeeting | QuoteSubmission | QuoteFollowUp => Category::NegotiationQuote,
            ComplaintAssessment | ComplaintApology => Category::Trouble,
            CalendarProposal | NewYearCardProposal => Category::SeasonalProposal,
        }
    }

    /// Wire name as stored in the `sub_category` column.
    pub fn name(self) -> &'static str {
        use SubCategory::*;
        match self {
            StockCheck => "在庫確認",
            Delivery => "納品対応",
            ProofMeeting => "校正の打合せ",
            QuoteSpecMeeting => "見積仕様の打合せ",
            QuoteSubmission => "見積書の提出",
            QuoteFollowUp => "見積案件の確認",
            ComplaintAssessment => "クレームの状況の確認",
            ComplaintApology => "謝罪とクレーム対応の説明",
            CalendarProposal => "カレンダーの提案",
            NewYearCardProposal => "年賀状の提案",
        }
    }

    /// Labels for `item_1..item_4`.
    pub fn labels(self) -> ItemLabels {
        use SubCategory::*;
        match self {
            StockCheck => ["確認商品名", "現在の残数", "残期間(目安)", "次回確認予定日"],
            Delivery => ["納品商品", "納品数量", "満足度", "他案件の有無"],
            ProofMeeting => ["案件名", "校正回数", "修正の有無", "最終校了日（予定日）"],
            QuoteSpecMeeting => ["対象商品", "仕様内容", "予定部数", "先方の予算感"],
            QuoteSubmission => [
                "見積金額",
                "提案内容",
                "見積額に対しての反応",
                "次回見積案件の確認日",
            ],
            QuoteFollowUp => ["検討状況", "決定時期", "懸念点・要望", "競合他社の有無"],
            ComplaintAssessment => [
                "クレーム対象商品",
                "被害枚数/範囲",
                "相手の要求事項",
                "応急処置の内容",
            ],
            ComplaintApology => ["解決状況", "相手の納得度", "再発防止策提出", "信頼回復の見込"],
            CalendarProposal | NewYearCardProposal => {
                ["現在の状況", "制作会社名", "反応・温度感", "検討時期"]
            }
        }
    }

    /// Resolve a sub-category name within `category`.
    pub fn from_name(category: Category, name: &str) -> Result<Self, CoreError> {
        category
            .sub_categories()
            .iter()
            .copied()
            .find(|s| s.name() == name)
            .ok_or_else(|| CoreError::UnknownSubcategory {
                category: category.name().to_string(),
                sub_category: name.to_string(),
            })
    }
}

impl Default for SubCategory {
    fn default() -> Self {
        Category::default().default_sub_category()
    }
}

// ---------------------------------------------------------------------------
// Name-based lookups
// ---------------------------------------------------------------------------

/// Category names in declaration order.
pub fn top_categories() -> Vec<&'static str> {
    Category::ALL.iter().map(|c| c.name()).collect()
}

/// Sub-category names of `category` in declaration order.
pub fn sub_categories(category: &str) -> Result<Vec<&'static str>, CoreError> {
    let category = Category::from_name(category)?;
    Ok(category.sub_categories().iter().map(|s| s.name()).collect())
}

/// Item labels for a (category, sub-category) pair.
pub fn labels(category: &str, sub_category: &str) -> Result<ItemLabels, CoreError> {
    let category = Category::from_name(category)?;
    Ok(SubCategory::from_name(category, sub_category)?.labels())
}

/// Item labels for a stored pair, degrading to [`PLACEHOLDER_LABELS`].
///
/// Stale or hand-edited rows must still render, so a miss is not an error.
pub fn labels_or_placeholder(category: &str, sub_category: &str) -> ItemLabels {
    match labels(category, sub_category) {
        Ok(labels) => labels,
        Err(e) => {
            tracing::debug!(category, sub_category, error = %e, "Schema lookup miss, using placeholder labels");
            PLACEHOLDER_LABELS
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// One category with its sub-categories, for clients rendering the selects.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryEntry {
    pub name: &'static str,
    pub sub_categories: Vec<SubCategoryEntry>,
}

/// One sub-category with its item labels.
#[derive(Debug, Clone, Serialize)]
pub struct SubCategoryEntry {
    pub name: &'static str,
    pub labels: ItemLabels,
}

/// The whole schema in declaration order.
pub fn schema_catalog() -> Vec<CategoryEntry> {
    Category::ALL
        .iter()
        .map(|c| CategoryEntry {
            name: c.name(),
            sub_categories: c
                .sub_categories()
                .iter()
                .map(|s| SubCategoryEntry {
                    name: s.name(),
                    labels: s.labels(),
                })
                .collect(),
        })
        .collect()
}
