//! Runtime values, thunks and environments.

mod env;
mod thunk;
mod value;

pub use env::Env;
pub use thunk::{Thunk, ThunkState};
pub use value::Value;
