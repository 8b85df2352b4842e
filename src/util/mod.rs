pub mod direction;
pub mod location;
