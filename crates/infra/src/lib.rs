pub mod models;
pub mod queue;
pub mod repos;
pub mod rules;
pub mod store;
