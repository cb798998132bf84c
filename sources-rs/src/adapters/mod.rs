pub mod scripted;
pub mod simulated;
