pub mod app;
pub mod cli;
pub mod config;
pub mod freight;
pub mod model;
pub mod output;
pub mod store;
pub mod utils;
pub mod words;

#[cfg(test)]
mod tests;
