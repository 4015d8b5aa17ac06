//! Core domain concepts shared across all subdomains.
//!
//! - [`query::Query`]: a validated query with derived category and complexity
//! - [`category::QueryCategory`]: broad intent buckets steering the pipeline
//! - [`candidate::CandidateResponse`]: one model's reply, successful or failed
//! - [`error::DomainError`]: domain-level errors

pub mod candidate;
pub mod category;
pub mod error;
pub mod query;
