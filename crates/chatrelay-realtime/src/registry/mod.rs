//! Session and room membership.

pub mod membership;
pub mod room;
pub mod session;

pub use membership::MembershipRegistry;
pub use session::Session;
