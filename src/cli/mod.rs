mod commands;

pub use commands::{diff_files, dump_files, Cli};
