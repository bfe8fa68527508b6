//! Entity records, re-exported from the storage crate so handler code can
//! depend on `api` alone.

pub use store::models::{Image, Recipe, User};
