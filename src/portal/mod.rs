//! Portal client: cookie session, login handshake, report extraction.
//!
//! One fetch walks four requests in a fixed order:
//!
//! ```text
//! GET  login page      -> ticket
//! POST login submit    (telnum, password, ticket)
//! GET  usage nav page  -> mfiv, mfym
//! POST report          (mfiv, mfym) -> usage tables
//! ```

pub mod auth;
pub mod extract;
pub mod html;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::authenticate;
pub use extract::extract;
pub use session::{HttpSession, HttpSessionFactory, PortalSession, SessionFactory};
