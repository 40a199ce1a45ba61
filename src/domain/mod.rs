pub mod distance;
pub mod instance;
pub mod parameters;
pub mod site;

pub use distance::*;
pub use instance::*;
pub use parameters::*;
pub use site::*;
