pub mod conversion;
pub mod error;
pub mod fuzz;
