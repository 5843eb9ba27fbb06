// Infrastructure layer - Configuration, fixture codec and the async driver
pub mod config;
pub mod jsonl;
pub mod runtime;
