//! Types library for the administered token ledger
//!
//! Leaf types shared by the ledger contract crate: account identities,
//! checked amount arithmetic and the fee schedule.
//!
//! # Modules
//! - `ids`: Account identity (`Address`) and the null identity
//! - `numeric`: `Amount` and checked arithmetic helpers
//! - `fee`: Fee schedule, ceilings and fee quotes
//! - `errors`: Arithmetic error taxonomy

pub mod errors;
pub mod fee;
pub mod ids;
pub mod numeric;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::errors::*;
    pub use crate::fee::*;
    pub use crate::ids::*;
    pub use crate::numeric::*;
}
