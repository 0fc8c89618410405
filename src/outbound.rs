pub mod memory;
pub mod runtime_cli;
pub mod state_file;
