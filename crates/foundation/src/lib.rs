pub mod bounds;
pub mod color;
pub mod math;
pub mod time;
pub mod units;

// Foundation crate: small, well-tested primitives only.
pub use bounds::*;
pub use color::*;
pub use math::*;
pub use time::*;
pub use units::*;
