//! Closed status-code table
//!
//! Every operation in the port layer resolves to one of these codes. The
//! numeric values and names are stable: application code compares raw codes
//! and prints names, so both are part of the contract.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name reported for a raw code outside the closed table.
pub const UNKNOWN_STATUS_NAME: &str = "UNKNOWN_ERROR";

/// Closed enumeration of port-layer status codes.
///
/// The raw values mirror the original numeric table (success is 0, failures
/// are negative). New codes must not be inserted between existing ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusCode {
    /// Operation completed.
    Ok,
    /// Generic failure.
    Fail,
    /// Allocation or resource-creation failure.
    NoMem,
    /// Caller passed an invalid argument.
    InvalidArg,
    /// Operation is not valid in the current state.
    InvalidState,
    /// Blocking operation exceeded its wait hint.
    Timeout,
    /// Store has no free pages to write into.
    NvsNoFreePages,
    /// Store data was written by a newer format version.
    NvsNewVersionFound,
    /// Requested key was never committed.
    NvsNotFound,
}

impl StatusCode {
    /// Returns the stable numeric code.
    pub const fn raw(self) -> i32 {
        match self {
            StatusCode::Ok => 0,
            StatusCode::Fail => -1,
            StatusCode::NoMem => -2,
            StatusCode::InvalidArg => -3,
            StatusCode::InvalidState => -4,
            StatusCode::Timeout => -5,
            StatusCode::NvsNoFreePages => -6,
            StatusCode::NvsNewVersionFound => -7,
            StatusCode::NvsNotFound => -8,
        }
    }

    /// Returns the stable literal name for this code.
    pub const fn name(self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Fail => "FAIL",
            StatusCode::NoMem => "NO_MEM",
            StatusCode::InvalidArg => "INVALID_ARG",
            StatusCode::InvalidState => "INVALID_STATE",
            StatusCode::Timeout => "TIMEOUT",
            StatusCode::NvsNoFreePages => "NVS_NO_FREE_PAGES",
            StatusCode::NvsNewVersionFound => "NVS_NEW_VERSION_FOUND",
            StatusCode::NvsNotFound => "NVS_NOT_FOUND",
        }
    }

    /// Looks up a code by its raw value.
    pub fn from_raw(raw: i32) -> Option<Self> {
        const ALL: [StatusCode; 9] = [
            StatusCode::Ok,
            StatusCode::Fail,
            StatusCode::NoMem,
            StatusCode::InvalidArg,
            StatusCode::InvalidState,
            StatusCode::Timeout,
            StatusCode::NvsNoFreePages,
            StatusCode::NvsNewVersionFound,
            StatusCode::NvsNotFound,
        ];
        ALL.into_iter().find(|code| code.raw() == raw)
    }

    /// Returns the name for a raw value, or [`UNKNOWN_STATUS_NAME`] when the
    /// value is outside the table.
    pub fn name_of_raw(raw: i32) -> &'static str {
        Self::from_raw(raw).map_or(UNKNOWN_STATUS_NAME, StatusCode::name)
    }

    /// Returns whether this code represents success.
    pub const fn is_ok(self) -> bool {
        matches!(self, StatusCode::Ok)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_values_are_stable() {
        assert_eq!(StatusCode::Ok.raw(), 0);
        assert_eq!(StatusCode::Fail.raw(), -1);
        assert_eq!(StatusCode::NoMem.raw(), -2);
        assert_eq!(StatusCode::InvalidArg.raw(), -3);
        assert_eq!(StatusCode::InvalidState.raw(), -4);
        assert_eq!(StatusCode::Timeout.raw(), -5);
        assert_eq!(StatusCode::NvsNoFreePages.raw(), -6);
        assert_eq!(StatusCode::NvsNewVersionFound.raw(), -7);
        assert_eq!(StatusCode::NvsNotFound.raw(), -8);
    }

    #[test]
    fn test_every_code_has_a_name() {
        for raw in -8..=0 {
            let code = StatusCode::from_raw(raw).unwrap();
            assert_ne!(code.name(), UNKNOWN_STATUS_NAME);
            assert_eq!(code.name(), StatusCode::name_of_raw(raw));
        }
    }

    #[test]
    fn test_unknown_raw_maps_to_unknown_name() {
        assert_eq!(StatusCode::name_of_raw(-99), UNKNOWN_STATUS_NAME);
        assert_eq!(StatusCode::name_of_raw(1), UNKNOWN_STATUS_NAME);
        assert!(StatusCode::from_raw(42).is_none());
    }

    #[test]
    fn test_round_trip_raw() {
        for raw in -8..=0 {
            let code = StatusCode::from_raw(raw).unwrap();
            assert_eq!(code.raw(), raw);
        }
    }

    #[test]
    fn test_display_uses_name() {
        assert_eq!(format!("{}", StatusCode::Timeout), "TIMEOUT");
        assert_eq!(format!("{}", StatusCode::NvsNotFound), "NVS_NOT_FOUND");
    }

    #[test]
    fn test_is_ok() {
        assert!(StatusCode::Ok.is_ok());
        assert!(!StatusCode::Fail.is_ok());
    }
}
