pub mod entity;
pub mod filter;
pub mod scanner;
