//! Common utilities and shared types for traversee.
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **Storage**: Image storage backends (local, S3-compatible)
//!
//! # Example
//!
//! ```no_run
//! use traversee_common::{AppResult, Config};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     println!("Listening on {}:{}", config.server.host, config.server.port);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod storage;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use storage::{
    ImageUpload, LocalStorage, SharedStorage, StorageBackend, UploadedFile, build_storage,
    forum_image_key, image_subtype, profile_photo_key,
};
