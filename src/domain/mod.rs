//! Domain layer - pure types and rules with no collaborators.
//!
//! This layer contains the core concepts of a relative-time label:
//! - Date inputs and their resolution to absolute instants
//! - Boolean coercion for host-supplied flags
//! - The live gate applied to clock ticks
//! - Relative-time units and locale string tables
//!
//! All types in this layer are easily testable in isolation.

pub mod date;
pub mod flag;
pub mod gate;
pub mod relative;
pub mod strings;
