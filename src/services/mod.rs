pub mod config;
pub mod exporter;
pub mod ocr;
pub mod preview;
pub mod result_store;
pub mod session;
pub mod validator;
