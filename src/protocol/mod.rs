pub mod emit;
pub mod parse;
pub mod types;
