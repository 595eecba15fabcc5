pub mod schema;
pub mod sessions;
pub mod visits;
