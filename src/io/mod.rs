pub mod csv;
pub mod json;

// Re-export commonly used functions
pub use csv::{read_csv, write_csv};
pub use json::{read_json, write_json};
