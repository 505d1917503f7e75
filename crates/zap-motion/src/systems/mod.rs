pub mod combine;
pub mod concat;
pub mod operators;
