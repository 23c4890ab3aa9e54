pub mod posts;
pub mod tags;
