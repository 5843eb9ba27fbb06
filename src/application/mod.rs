// Application layer - Sampling, aggregation and scheduling over the domain types
pub mod dashboard_service;
pub mod engine;
pub mod mission_accumulator;
pub mod noise;
pub mod panels;
pub mod rolling_buffer;
pub mod sample_source;
pub mod scheduler;
pub mod stats;
pub mod stopwatch;
pub mod view_projector;
