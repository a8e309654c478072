//! # hdiv-core: Foundational Types for the Divisions Dataset
//!
//! Leaf crate of the workspace. Defines the primitives every other crate
//! works in terms of:
//!
//! 1. **`DivisionId` newtype.** No bare strings for division identifiers.
//!    The version suffix convention (`<base>:<version>`) lives here.
//!
//! 2. **`ValidityDate` / `ValidityWindow`.** Historical dates of varying
//!    precision normalized to calendar days; open bounds stay explicit.
//!
//! 3. **`HdivError`.** The fatal error taxonomy: missing dataset, parse,
//!    encoding, IO and configuration failures.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `hdiv-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod temporal;

pub use error::{DateError, HdivError};
pub use identity::DivisionId;
pub use temporal::{ValidityDate, ValidityWindow};
