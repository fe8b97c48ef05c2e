pub mod config;
pub mod store;
pub mod view_model;

pub use config::*;
pub use store::*;
pub use view_model::*;
