//! Access gate in front of the frontend pages.
//!
//! API routes, static assets and docs pass through; page requests are checked
//! against the caller's session and role before the frontend is served.

mod middleware;
mod policy;

pub use middleware::{access_gate, AccessGate};
pub use policy::GatePolicy;
