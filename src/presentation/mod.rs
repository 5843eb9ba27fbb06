// Presentation layer - Operator commands and view output
pub mod handlers;
pub mod tracing_projector;
