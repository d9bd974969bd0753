pub mod clipboard;
pub mod ocr;
pub mod web;

pub use ocr::OcrEngine;
pub use web::fetch_text;
