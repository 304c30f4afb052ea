pub mod metadata;
pub mod status;
pub mod upload;
