use std::{
    fmt,
    io::{self, Read},
    slice,
};

use http::{HeaderMap, HeaderName, HeaderValue};

use crate::{
    error::{MultipartError, ParseError},
    limits::Limits,
    parser::{delimiter::Delimiter, scanner::DelimiterScanner},
    source::PushbackReader,
};

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";
const LINE_END: &[u8] = b"\r\n";
const NAME_SEPARATOR: &[u8] = b":";

/// One raw header line of a part: name and undecoded, untrimmed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    name: String,
    value: String,
}

impl Header {
    /// Creates a header from its name and raw value.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Header name exactly as it appeared before the first `:`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Header value exactly as it appeared after the first `:`.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Header value with surrounding whitespace removed.
    pub fn trimmed_value(&self) -> &str {
        self.value.trim()
    }

    fn is_named(&self, name: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(name)
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.value)
    }
}

/// Ordered header list of a part, duplicates preserved.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Headers {
    entries: Vec<Header>,
}

impl Headers {
    /// Creates an empty header list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a header, keeping encounter order.
    pub fn push(&mut self, header: Header) {
        self.entries.push(header);
    }

    /// Raw value of the first header named `name`, compared case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|header| header.is_named(name))
            .map(Header::value)
    }

    /// Raw values of every header named `name`, in encounter order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |header| header.is_named(name))
            .map(Header::value)
    }

    /// Iterates headers in encounter order.
    pub fn iter(&self) -> slice::Iter<'_, Header> {
        self.entries.iter()
    }

    /// Number of headers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the part had no headers.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Converts into an [`http::HeaderMap`], trimming names and values.
    ///
    /// Fails when a name or value is not acceptable to `http`.
    pub fn to_header_map(&self) -> Result<HeaderMap, ParseError> {
        let mut map = HeaderMap::with_capacity(self.entries.len());
        for header in &self.entries {
            let name = HeaderName::from_bytes(header.name.trim().as_bytes())
                .map_err(|_| ParseError::new("invalid part header name"))?;
            let value = HeaderValue::from_bytes(&encode_latin1(header.trimmed_value())?)
                .map_err(|_| ParseError::new("invalid part header value"))?;
            map.append(name, value);
        }
        Ok(map)
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = &'a Header;
    type IntoIter = slice::Iter<'a, Header>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Header> for Headers {
    fn from_iter<I: IntoIterator<Item = Header>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Reads the header block at the start of a part.
///
/// Returns the headers in encounter order and a source positioned at the
/// first body byte. The block ends at `\r\n\r\n`, at the end of `source`, or
/// at the first line with an empty name or no `:` at all; such a line is not
/// recorded. A part starting directly with `\r\n` has no headers.
///
/// Names and values are decoded as ISO-8859-1.
pub fn parse_header_block<R: Read>(
    source: R,
    limits: &Limits,
) -> Result<(Headers, PushbackReader<R>), MultipartError> {
    let mut source = PushbackReader::new(source);
    let mut lead = [0u8; 2];
    let lead_len = read_up_to(&mut source, &mut lead)?;
    if &lead[..lead_len] == LINE_END {
        return Ok((Headers::new(), source));
    }
    source.unread(&lead[..lead_len]);

    let section = DelimiterScanner::with_source(source, Delimiter::from_static(HEADER_TERMINATOR));
    let mut rest = PushbackReader::new(section);
    let mut headers = Headers::new();

    while !rest.at_end()? {
        let mut line = DelimiterScanner::with_source(rest, Delimiter::from_static(LINE_END));
        let header = read_header_line(&mut line, limits)?;
        rest = line.into_remaining()?;

        let Some(header) = header else {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                headers = headers.len(),
                "headers: block ended on a line without a header name"
            );
            break;
        };

        if let Some(max_headers) = limits.max_headers {
            if headers.len() >= max_headers {
                return Err(MultipartError::HeadersLimitExceeded { max_headers });
            }
        }
        headers.push(header);
    }

    let body = rest.into_inner().into_remaining()?;
    Ok((headers, body))
}

fn read_header_line<R: Read>(
    line: &mut DelimiterScanner<R>,
    limits: &Limits,
) -> Result<Option<Header>, MultipartError> {
    let max_header_size = limits.max_header_size;
    let mut name_scanner = DelimiterScanner::new(&mut *line, Delimiter::from_static(NAME_SEPARATOR));

    let mut name = Vec::new();
    if !read_capped(&mut name_scanner, &mut name, max_header_size)? {
        return Err(size_exceeded(max_header_size));
    }
    if name.is_empty() || !name_scanner.delimiter_found() {
        return Ok(None);
    }

    let mut value = Vec::new();
    let value_cap = max_header_size.map(|max| max - name.len() as u64);
    if !read_capped(name_scanner.into_remaining()?, &mut value, value_cap)? {
        return Err(size_exceeded(max_header_size));
    }

    Ok(Some(Header::new(decode_latin1(&name), decode_latin1(&value))))
}

fn size_exceeded(max_header_size: Option<u64>) -> MultipartError {
    MultipartError::HeaderSizeLimitExceeded {
        max_header_size: max_header_size.unwrap_or(u64::MAX),
    }
}

// Returns false when more than `cap` bytes were available.
fn read_capped<R: Read>(reader: R, out: &mut Vec<u8>, cap: Option<u64>) -> io::Result<bool> {
    let Some(cap) = cap else {
        let mut reader = reader;
        reader.read_to_end(out)?;
        return Ok(true);
    };

    let read = reader.take(cap.saturating_add(1)).read_to_end(out)?;
    Ok(read as u64 <= cap)
}

fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}

pub(crate) fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&byte| char::from(byte)).collect()
}

fn encode_latin1(text: &str) -> Result<Vec<u8>, ParseError> {
    text.chars()
        .map(|ch| {
            u8::try_from(ch).map_err(|_| ParseError::new("header value is not ISO-8859-1"))
        })
        .collect()
}
