pub mod engine;
pub mod http_ocr;
pub mod invoker;

// Re-export main types
pub use engine::{ProgressSender, RecognitionEngine};
pub use http_ocr::HttpRecognitionEngine;
pub use invoker::RecognitionInvoker;
