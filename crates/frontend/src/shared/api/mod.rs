//! HTTP client adapter.
//!
//! `ApiClient` wraps a [`Transport`] with the base URL, default headers and
//! the two interceptors: bearer-token injection on the way out, centralized
//! error handling on the way back. Callers always get the decoded body, and
//! intercepted errors are handed back with status and payload intact.

pub mod client;
pub mod error;
pub mod events;
pub mod transport;

pub use client::{ApiClient, RequestConfig};
pub use error::{ApiError, ErrorPayload};
pub use events::{ApiEvent, ApiEventBus};
pub use transport::{GlooTransport, HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
