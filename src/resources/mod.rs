pub mod cli;
pub mod clock;
pub mod config;
pub mod draw_order;
pub mod force_sources;
pub mod gusts;
pub mod wind;

pub use cli::*;
pub use clock::*;
pub use config::*;
pub use draw_order::*;
pub use force_sources::*;
pub use gusts::*;
pub use wind::*;
