pub mod diagnosis;
pub mod import;
