pub mod layer;
pub mod point_cloud;
pub mod vector;

pub use layer::*;
pub use point_cloud::*;
pub use vector::*;
