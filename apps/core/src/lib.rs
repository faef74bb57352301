//! Campus assistant core: routes student questions to portal data or a language model.

pub mod actors;
pub mod assistant;
pub mod brain;
pub mod campus;
pub mod config;
pub mod database;
pub mod error;
pub mod models;

#[cfg(test)]
mod tests;
