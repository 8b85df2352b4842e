pub mod constants;
pub mod session;
pub mod settlement;
pub mod task;
