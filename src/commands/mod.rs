pub mod find_definition;
pub mod list_files;
