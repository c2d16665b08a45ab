//! Input processing module
//! Handles file detection and text extraction for resumes and job descriptions

pub mod file_detector;
pub mod text_extractor;
pub mod manager;

pub use file_detector::FileType;
pub use manager::InputManager;
