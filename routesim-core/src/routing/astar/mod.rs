mod search;
mod state;

pub use search::{PathSolver, solve};
