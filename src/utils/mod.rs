pub mod depth_order;
pub mod grid_mesh;
pub mod noise_map;
pub mod placement;
