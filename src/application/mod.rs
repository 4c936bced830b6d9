//! Application layer orchestrating the end-to-end transaction flow.
//!
//! The flow is a fixed sequence of steps driven through the `PlatformApi`
//! port, so it runs the same against the live platform or a test double.

pub mod scenario;
