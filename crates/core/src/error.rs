#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unknown category '{0}'")]
    UnknownCategory(String),

    #[error("Unknown sub-category '{sub_category}' for category '{category}'")]
    UnknownSubcategory {
        category: String,
        sub_category: String,
    },
}
