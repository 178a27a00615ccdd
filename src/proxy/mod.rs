//
// src/proxy/mod.rs
//
mod error;
mod translator;
mod types;

pub use error::{truncate_chars, ErrorKind, TranslateError, BODY_EXCERPT_CHARS};
pub use translator::{parse_translation, TranslationProxy, NO_TRANSLATION};
pub use types::{TranslationOutcome, TranslationRequest};
