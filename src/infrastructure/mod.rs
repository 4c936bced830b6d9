pub mod dmoney_client;
pub mod in_memory;
pub mod json_file;
