//! # Port Layer Contract Tests
//!
//! This crate provides "golden" tests for the behaviors ported application
//! code depends on, so they don't drift accidentally over time.
//!
//! ## Philosophy
//!
//! - **Explicit over implicit**: the calling contract is written as code
//! - **Testability first**: contract tests fail when semantics change
//! - **Cross-crate**: each module exercises primitives the way application
//!   code combines them, not in isolation
//!
//! ## Structure
//!
//! - [`queue_contract`]: FIFO ordering and occupancy bounds under real tasks
//! - [`lock_contract`]: mutual exclusion and domain independence under stress
//! - [`timing_contract`]: delay lower bounds against the monotonic clock
//! - [`store_contract`]: persistence visibility across handles and reopens
//! - [`status_contract`]: stability of the closed status-code table

pub mod lock_contract;
pub mod queue_contract;
pub mod status_contract;
pub mod store_contract;
pub mod timing_contract;
