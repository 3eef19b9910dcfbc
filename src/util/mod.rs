// ============================================================================
// src/util/mod.rs – re-exports for utility modules
// ============================================================================

pub mod atomic;
pub mod paths;
