//! Static catalogs of the platform's SQL support surface.
//!
//! These are fixed tables, not configuration. They follow the platform's
//! published SQL reference and change only with it.

pub mod functions;
pub mod keywords;
pub mod system_views;

pub use system_views::{is_system_view, system_view_fields, system_view_name, SYSTEM_VIEWS};
