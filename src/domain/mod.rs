// Domain layer - Plain data types shared by every panel
pub mod dashboard;
pub mod hotspot;
pub mod mission;
pub mod sample;
pub mod telemetry;
