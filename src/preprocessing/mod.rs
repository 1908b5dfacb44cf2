/// Turning continuous columns into symbolic bins
pub mod discretizer;
pub mod params;
