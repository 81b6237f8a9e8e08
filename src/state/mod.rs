pub mod analysis;
pub mod series;
