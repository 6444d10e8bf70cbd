/// Boundary token and derived wire delimiters.
pub mod boundary;
/// Fixed delimiter with linear-time search.
pub mod delimiter;
/// `Content-Disposition` value parsing.
pub mod disposition;
/// Part header block parsing.
pub mod headers;
/// Delimiter-bounded streaming scanner.
pub mod scanner;

pub use boundary::{extract_multipart_boundary, Boundary};
pub use delimiter::Delimiter;
pub use disposition::{parse_content_disposition, ContentDisposition};
pub use headers::{parse_header_block, Header, Headers};
pub use scanner::DelimiterScanner;
