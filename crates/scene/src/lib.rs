pub mod picking;
pub mod surfaces;

pub use picking::*;
pub use surfaces::*;
