pub mod core;
pub mod debug_ui;
pub mod input;
pub mod presentation;
pub mod scene;
pub mod simulation;
