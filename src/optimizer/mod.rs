pub mod diagnostics;
pub mod extract;
pub mod model;
pub mod solution;
pub mod solver;

pub use diagnostics::explain_infeasibility;
pub use extract::*;
pub use model::*;
pub use solution::*;
pub use solver::*;
