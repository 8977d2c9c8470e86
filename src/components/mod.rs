pub mod orderable;
pub mod player;
pub mod vegetation;

pub use orderable::*;
pub use player::*;
pub use vegetation::*;
