pub mod generator;
pub mod intake;
pub mod workflow;
