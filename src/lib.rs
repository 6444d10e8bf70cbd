#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Streaming MIME multipart splitter.
//!
//! [`Multipart`] splits a message read from any [`std::io::Read`] into its
//! preamble, parts and epilogue without buffering a whole part. Each part
//! exposes its raw headers and a reader over its body.
//!
//! ```
//! use std::io::Read;
//!
//! use mimesplit::Multipart;
//!
//! let body: &[u8] = b"--XB\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\n1\r\n--XB--";
//! let mut multipart = Multipart::new(body, "XB");
//! let mut parts = multipart.parts()?;
//! while let Some(mut part) = parts.next_part()? {
//!     let mut value = String::new();
//!     part.read_to_string(&mut value)?;
//!     assert_eq!(part.field_name().as_deref(), Some("a"));
//!     assert_eq!(value, "1");
//! }
//! # Ok::<(), mimesplit::MultipartError>(())
//! ```

/// Fluent builder API.
pub mod builder;
/// Splitter configuration.
pub mod config;
/// Error types exposed by this crate.
pub mod error;
/// Structural limits.
pub mod limits;
/// Multipart message splitter.
pub mod multipart;
/// Part API.
pub mod part;
/// Low-level parser components.
pub mod parser;
/// Byte source with pushback.
pub mod source;

pub use builder::MultipartBuilder;
pub use config::MultipartConfig;
pub use error::{ConfigError, MultipartError, ParseError, StateError};
pub use limits::Limits;
pub use multipart::{Epilogue, Multipart, Parts, Preamble};
pub use part::Part;
pub use parser::{Boundary, ContentDisposition, Delimiter, DelimiterScanner, Header, Headers};
pub use source::PushbackReader;
