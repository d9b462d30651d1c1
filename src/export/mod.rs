//! Quicken price import output

pub mod transform;
pub mod writer;

pub use transform::{DateStyle, QuickenRecord, transform};
pub use writer::{default_output_path, read_records, write_records};
