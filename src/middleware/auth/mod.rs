/*
 * Responsibility
 * - authorization middleware (capability guard)
 */
pub mod capability;

pub use capability::Capability;
