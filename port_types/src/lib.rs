//! # Port Types
//!
//! This crate defines the fundamental types shared by the port layer.
//!
//! ## Philosophy
//!
//! - **Explicit over implicit**: status codes form a closed, named table.
//! - **Type safety first**: handles are typed ids, not interchangeable
//!   pointers, so passing a timer handle where a task handle belongs is a
//!   compile error.
//! - **Wait hints are values**: blocking operations take a [`Wait`] hint
//!   instead of a magic tick count.
//!
//! ## Key Types
//!
//! - [`StatusCode`]: the closed status enumeration with a stable name table
//! - [`TaskId`] / [`TimerId`]: typed handle identifiers
//! - [`Ticks`]: wraparound-tolerant millisecond tick counter
//! - [`Wait`]: caller-supplied maximum blocking duration

pub mod ids;
pub mod status;
pub mod time;

pub use ids::{TaskId, TimerId};
pub use status::StatusCode;
pub use time::{Ticks, Wait};
