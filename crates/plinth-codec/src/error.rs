//! Error types for the codec.
//!
//! Every failure carries an [`ErrorCode`] for documentation and
//! searchability, and an [`ErrorCategory`] telling the caller whether a
//! diagram could be rebuilt at all.

mod category;
mod decode_error;
mod error_code;

pub use category::ErrorCategory;
pub use decode_error::{DecodeError, RecordRef};
pub use error_code::ErrorCode;
