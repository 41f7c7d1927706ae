// Domain layer - Pure telemetry types and computations
pub mod error;
pub mod frame;
pub mod history;
pub mod sample;
pub mod trend;
pub mod view;
