//! Request extractors that reject with [`crate::error::AppError`] so every malformed input maps to
//! the same `400` error body.

mod json_body;
mod page;
mod record_id;

pub use json_body::JsonBody;
pub use page::PageParams;
pub use record_id::RecordId;
