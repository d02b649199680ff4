//! Render pipelines: the lit model drawn by each hologram camera and the
//! textured quads that composite the four views.

pub mod model;
pub mod quad;
