//! Domain types and models
//!
//! Grouped by the part of the request pipeline that produces or consumes
//! them.

pub mod auth;
pub mod http;
pub mod pagination;

pub use auth::{AuthData, RefreshData};
pub use http::{query_pairs, HeadersExt, HttpHeaders, HttpMethod, HttpParams, ParamValue};
pub use pagination::{Link, Links, PagedResult};
