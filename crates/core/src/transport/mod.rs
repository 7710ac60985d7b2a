//! HTTP transport port
//!
//! The request pipeline never talks to a socket directly. It hands a fully
//! built [`HttpRequest`] to an [`HttpTransport`] and inspects the returned
//! status and body.

pub mod ports;

pub use ports::{HttpRequest, HttpResponse, HttpTransport, RequestBody};
