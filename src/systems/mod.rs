pub mod depth_order;
pub mod player;
pub mod render;
pub mod vegetation;
pub mod wind;

pub use depth_order::*;
pub use player::*;
pub use render::*;
pub use vegetation::*;
pub use wind::*;
