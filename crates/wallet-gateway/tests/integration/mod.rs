//! Integration Tests Module
//!
//! - `mock_gateway`: in-process gateway that checks request signatures and
//!   signs its replies the way the real service does
//! - `signing_flow`: signer/verifier properties
//! - `client_flow`: the seven operations end to end
//! - `failure_flow`: error taxonomy as seen by callers


mod client_flow;
