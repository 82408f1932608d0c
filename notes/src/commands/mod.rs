pub mod executor;

pub use executor::{execute_command, Flow};
