pub mod mat;
pub mod plane;
pub mod precision;
pub mod vec;

pub use mat::*;
pub use plane::*;
pub use precision::*;
pub use vec::*;
