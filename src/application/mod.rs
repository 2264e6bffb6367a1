// Application layer - Use cases and the seams they depend on
pub mod control_surface;
pub mod dashboard_state;
pub mod derivation;
pub mod polling_controller;
pub mod random_source;
pub mod reading_repository;
pub mod reading_service;
pub mod reading_source;
pub mod ticker;
