pub mod clock;
pub mod frames;
pub mod sequence;
