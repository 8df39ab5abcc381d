pub mod keys;
pub mod migrate;
pub mod value;
