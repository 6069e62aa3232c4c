//! Application layer containing the provisioning and token-management logic.
//!
//! `ProvisioningOrchestrator` validates and fans out push provisioning
//! requests, `TokenRegistry` serves the token lifecycle operations. Both
//! receive their gateway at construction time. Completion events leave the
//! request path through a `tokio` channel drained by a background worker.

pub mod notifications;
pub mod orchestrator;
pub mod registry;
