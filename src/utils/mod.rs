pub mod fs;

pub use fs::{backup_file, read_file_to_string, write_file_atomic};
