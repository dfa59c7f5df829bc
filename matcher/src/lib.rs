pub mod analysis_service;
pub mod catalog_service;
pub mod config;
pub mod data_url;
pub mod error;
pub mod gemini_service;
pub mod models;
pub mod prompt;
pub mod reply_parser;

pub use analysis_service::AnalysisService;
pub use catalog_service::{FirestoreCatalog, ResourceCatalog};
pub use config::{Config, Limits};
pub use error::{ConfigError, ReplyParseError};
pub use gemini_service::{GeminiService, GenerativeModel};
pub use models::*;
