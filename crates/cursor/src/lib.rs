pub mod config;
pub mod controller;
pub mod frame;

pub use config::*;
pub use controller::*;
pub use frame::*;
