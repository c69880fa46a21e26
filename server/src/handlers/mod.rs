pub mod extract_handlers;
pub mod upload;
pub mod visualize_handlers;
