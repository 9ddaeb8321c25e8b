pub mod extractor;
pub mod jwt;
pub mod matrix;
pub mod password;
