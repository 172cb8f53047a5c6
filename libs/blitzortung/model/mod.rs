//! Records delivered by the lightning feed

pub mod strike;

pub use strike::{Polarity, Station, Strike};
