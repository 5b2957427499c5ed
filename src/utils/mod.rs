pub mod buffer;
pub mod resample;
pub mod vector;
