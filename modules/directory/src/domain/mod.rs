pub mod client;
pub mod error;
pub mod models;
pub mod service;
pub mod validation;

#[cfg(test)]
mod service_test;
