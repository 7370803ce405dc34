//! `sumext`: a CPython extension module exporting `sum(a, b)`.
//!
//! Built as a `cdylib`; the interpreter finds `PyInit_sumext` by name,
//! registers the function table, and calls `sum` through the C API.
//!
//! # See also
//! - `pyproject.toml` for the wheel build.

pub mod api;
pub mod module;

pub use module::{exported_names, init_mode, PyInit_sumext};
