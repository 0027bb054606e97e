mod describe;
mod trigger;

pub use describe::handle_describe;
pub use trigger::{handle_run, RunArgs};
