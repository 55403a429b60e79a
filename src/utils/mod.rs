pub mod data;
pub mod demo;
pub mod status;
pub mod tip_classifier;
