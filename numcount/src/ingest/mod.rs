//! Per-modality ingest paths.
//!
//! Each path validates its raw input at the boundary, runs the shared
//! [`tally`](crate::tally) pipeline, and reports failures as
//! [`NumcountError`](crate::error::NumcountError) kinds. HTTP mapping happens
//! once, in the error type, not here.

pub mod image;
pub mod text;

pub use image::{ingest_image, UploadedImage, ACCEPTED_IMAGE_TYPES};
pub use text::{ingest_text, TextInput};
