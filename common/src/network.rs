pub mod address;
pub mod identifier;
pub mod subnet;
