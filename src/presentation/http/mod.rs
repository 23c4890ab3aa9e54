pub mod error;
pub mod health;
pub mod posts;
pub mod tags;
