pub mod records;
pub mod rows;
pub mod week;
