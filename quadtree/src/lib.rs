pub mod align;
pub mod collision_detection;
pub mod error;
pub mod point;
pub mod quadtree;
pub mod raster;

pub use common::shapes;
pub use error::{QuadtreeError, QuadtreeResult};
