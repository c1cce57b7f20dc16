//! Decoded frames and the pixel accessor rules evaluate against.
//!
//! - **Frame**: [`Frame`] trait, implemented for the `image` crate's buffers
//! - **Decode**: [`decode_frame`], content-sniffing decode of a frame on disk

mod decode;
mod frame;

pub use decode::{DecodeError, decode_frame};
pub use frame::Frame;
