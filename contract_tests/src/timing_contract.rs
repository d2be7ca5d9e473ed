//! Timing contract: delay lower bounds measured on the monotonic clock.
