pub mod client;
pub mod posts;
