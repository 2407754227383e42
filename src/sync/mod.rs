pub mod barrier;
pub mod state;
pub mod tracker;
