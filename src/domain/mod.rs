pub mod actor;
pub mod identity;
pub mod money;
pub mod ports;
pub mod transaction;
