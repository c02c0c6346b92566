//! Passkey credential exchange: codec, capability checks and authenticator calls

pub mod authenticator;
pub mod capability;
pub mod codec;
pub mod operations;
pub mod types;

pub use authenticator::Authenticator;
pub use capability::{CapabilityChecker, ExecutionContext};
pub use operations::PasskeyOperations;
pub use types::*;
