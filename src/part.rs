use std::io::{self, Read};

use bytes::Bytes;

use crate::{
    error::{MultipartError, ParseError},
    multipart::BodySource,
    parser::{
        disposition::{parse_content_disposition, ContentDisposition},
        headers::Headers,
    },
};

/// One part of a multipart message: its headers and a reader over its body.
///
/// A part borrows the message it came from. The body is streamed from the
/// underlying source as it is read; dropping a part without reading the body
/// simply skips it.
#[derive(Debug)]
pub struct Part<'a, R> {
    index: usize,
    headers: Headers,
    body: &'a mut BodySource<R>,
}

impl<'a, R> Part<'a, R> {
    pub(crate) fn new(index: usize, headers: Headers, body: &'a mut BodySource<R>) -> Self {
        Self {
            index,
            headers,
            body,
        }
    }

    /// Zero-based position of this part in the message.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Headers of this part in encounter order.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Raw value of the first header named `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Parsed `Content-Type` of this part, if the header is present.
    pub fn content_type(&self) -> Option<Result<mime::Mime, ParseError>> {
        self.header("content-type").map(|raw| {
            raw.trim()
                .parse::<mime::Mime>()
                .map_err(|_| ParseError::new("invalid part Content-Type header"))
        })
    }

    /// Parsed `Content-Disposition` of this part, if the header is present.
    pub fn content_disposition(&self) -> Option<Result<ContentDisposition, ParseError>> {
        self.header("content-disposition")
            .map(|raw| parse_content_disposition(raw.trim()))
    }

    /// The `name` parameter of `Content-Disposition`, if present and valid.
    pub fn field_name(&self) -> Option<String> {
        self.content_disposition()?.ok()?.name
    }

    /// The file name from `Content-Disposition`, if present and valid.
    pub fn file_name(&self) -> Option<String> {
        self.content_disposition()?.ok()?.filename
    }
}

impl<R: Read> Part<'_, R> {
    /// Reads the rest of the body.
    pub fn read_bytes(&mut self) -> io::Result<Bytes> {
        let mut buf = Vec::new();
        self.read_to_end(&mut buf)?;
        Ok(Bytes::from(buf))
    }

    /// Reads the rest of the body and decodes it as UTF-8 text.
    pub fn text(&mut self) -> Result<String, MultipartError> {
        let mut buf = Vec::new();
        self.read_to_end(&mut buf)?;
        String::from_utf8(buf)
            .map_err(|_| ParseError::new("part body is not valid UTF-8").into())
    }
}

impl<R: Read> Read for Part<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.body.read(buf)
    }
}
