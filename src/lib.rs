//! Wind-driven vegetation and depth-ordered drawing for 2D Bevy scenes.
//!
//! A scene owns one `WindField`, a `GustRegistry` of transient gusts and a
//! `ForceSourceSet` of point forces. Each frame the transient state advances
//! first, then every vegetation instance samples the field and turns the
//! sample into a rotation (rigid blades) or per-vertex offsets (grid-sliced
//! foliage). Finally all orderable drawables are sorted back to front.

pub mod components;
pub mod error;
pub mod events;
pub mod plugins;
pub mod resources;
pub mod systems;
pub mod utils;
