//! Types library for the collectibles marketplace
//!
//! This library provides the core type definitions shared across the
//! marketplace engine, ensuring type safety and deterministic arithmetic.
//!
//! # Modules
//! - `ids`: Identifiers (ItemId, Address, QuoteToken, RecordId)
//! - `amount`: Unsigned integer money amounts with checked arithmetic
//! - `fee`: Fee schedule and three-way fee split

// Public modules
pub mod amount;
pub mod fee;
pub mod ids;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::amount::*;
    pub use crate::fee::*;
    pub use crate::ids::*;
}
