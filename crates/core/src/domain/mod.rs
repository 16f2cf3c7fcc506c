pub mod quote;
pub mod service;
