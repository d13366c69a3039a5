//! Transpiler tests.

mod compile;
mod errors;
