//! Error classification and user notification for transport failures.

mod classify;
mod handler;

pub use classify::{
    Classification, ErrorClass, FALLBACK_MESSAGE, FORBIDDEN_MESSAGE, NOT_FOUND_MESSAGE,
    UNAUTHORIZED_MESSAGE, classify, extract_message,
};
pub use handler::ErrorHandler;
