pub mod clock;
pub mod controller;
pub mod error;
pub mod line;
pub mod parser;
pub mod serialiser;
pub mod store;
