// Canonical record
pub mod models;

// Query predicates
pub mod filters;

// Shared query composition (Field, ListQuery)
pub mod query;

// Repository traits
pub mod repositories;

// Domain-specific error types
pub mod errors;
