pub mod aggregate;
pub mod completeness;
pub mod derive;
pub mod record;
