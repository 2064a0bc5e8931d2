pub mod types;
pub mod wire;

pub use types::pagination::PaginatedResult;
