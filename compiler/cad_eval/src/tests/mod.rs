//! Test modules for the operator families.
//!
//! Kept out of the implementation files so each handler stays readable.
