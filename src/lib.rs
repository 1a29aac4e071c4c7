// Library exports shared by the webp-convert and char-art binaries
pub mod cli;
pub mod image_processing;
pub mod json_output;
pub mod utils;

// Re-export commonly used types
pub use cli::{ArtArgs, ConvertArgs};
pub use image_processing::art::{ArtConfig, RenderMode};
pub use image_processing::{ConversionConfig, ConversionEngine, ConversionReport};
pub use json_output::JsonMessage;
