pub mod chars;
pub mod cursor;
