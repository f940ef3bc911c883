pub mod cleanup;
pub mod records;
