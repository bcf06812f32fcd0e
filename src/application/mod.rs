// Application layer - Use cases and the seams they depend on
pub mod dashboard_service;
pub mod display_driver;
pub mod frame_renderer;
pub mod stats_api;
pub mod stats_service;
