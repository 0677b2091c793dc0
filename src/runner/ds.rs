pub mod error;
pub mod hierarchy;
pub mod types;
pub mod value;
