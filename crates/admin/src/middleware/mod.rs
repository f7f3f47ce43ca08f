//! HTTP middleware stack for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (added in `main`)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID
//! 4. Security headers
//! 5. Session layer (tower-sessions, in-memory store)
//! 6. Session expiry (drops the session after a backend 401)
//!
//! Authentication is enforced per handler by the [`RequireAdminAuth`]
//! extractor.

pub mod auth;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{AdminSession, RequireAdminAuth};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::{create_session_layer, session_expiry_middleware};
