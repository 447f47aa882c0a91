pub mod carrier;
pub mod ranking;
pub mod rate;
pub mod weights;
