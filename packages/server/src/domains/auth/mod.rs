//! Auth domain - bearer token verification
//!
//! Token issuance belongs to the external identity provider; the portal
//! only mints tokens in tests and verifies what it receives.

pub mod jwt;

pub use jwt::{Claims, JwtService};
