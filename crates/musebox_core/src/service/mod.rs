//! Use-case services wrapping the repository layer.
//!
//! Services are the view-model boundary: thin CRUD facades that re-fetch
//! after every write so callers always hold store-backed state.

pub mod inspiration_service;
pub mod tag_service;
pub mod task_service;
