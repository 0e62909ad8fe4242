//! Result Records
//!
//! Plain value types returned by the gateway operations. They carry no
//! parsing logic; [`crate::decode`] builds them from verified response bodies.

mod account;
mod constants;
mod payment;
mod statement;

pub use account::*;
pub use constants::*;
pub use payment::*;
pub use statement::*;
