//! REST plumbing shared by every console module.
//!
//! - [`Problem`] - RFC 9457 error body used for every non-2xx answer
//! - [`ApiResult`] - handler result alias so `?` converts domain errors
//! - [`Authz`] - extractor for the [`console_security::Identity`] attached by the gate
//! - [`ApiJson`], [`ApiPath`], [`ApiQuery`] - input extractors that reject with a [`Problem`]

pub mod extract;
pub mod problem;

pub use extract::{ApiJson, ApiPath, ApiQuery, Authz};
pub use problem::{ApiResult, Problem};
