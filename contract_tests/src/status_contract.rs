//! Status contract: the closed code table and the per-crate mappings into it.
