//! HTTP access layer

pub mod client;
pub mod query;

pub use client::{ApiClient, ApiRequest, FilePart, MultipartBody, RequestBody};
pub use query::QueryParams;
