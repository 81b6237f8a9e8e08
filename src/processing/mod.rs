pub mod comparison;
pub mod linear_model;
pub mod outlier;
pub mod statistics;
pub mod window;
