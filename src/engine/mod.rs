//! Request construction and the per-run dispatch sequence.

pub mod dispatch;
pub mod request;

pub use dispatch::{dispatch, Outcome};
pub use request::{build_request, resolve_body, PreparedRequest};
