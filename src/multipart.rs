use std::{
    io::{self, Read},
    mem,
};

use crate::{
    config::MultipartConfig,
    error::{ConfigError, MultipartError, ParseError, StateError},
    parser::{
        boundary::{extract_multipart_boundary, Boundary},
        headers::{parse_header_block, Headers},
        scanner::DelimiterScanner,
    },
    part::Part,
    source::PushbackReader,
};

/// Scanner over one preamble or part segment, reading through the scanner
/// bounded by the closing delimiter.
pub(crate) type Segment<R> = DelimiterScanner<DelimiterScanner<R>>;

/// Unread body bytes of the current part.
pub(crate) type BodySource<R> = PushbackReader<Segment<R>>;

#[derive(Debug)]
enum Stage<R> {
    Preamble(Segment<R>),
    Body(BodySource<R>),
    Exhausted(PushbackReader<DelimiterScanner<R>>),
    Poisoned,
}

/// Streaming splitter for one multipart message.
///
/// The message is read once, front to back, from `R`. The preamble, the
/// parts and the epilogue are handed out in that order, each at most once:
///
/// * [`Multipart::preamble`] can only be requested before the parts,
/// * [`Multipart::parts`] can be requested once; its first advance discards
///   whatever of the preamble was not read,
/// * [`Multipart::into_epilogue`] can be called at any point and discards any
///   part not read yet.
///
/// The whole source is first bounded by the closing delimiter `\r\n--B--`, and
/// every preamble and part scan reads through that bound, so a part scan can
/// never run past the end of the message. Only the scanner of the current
/// segment holds a search window; memory use does not grow with the size of
/// the message or of a part.
#[derive(Debug)]
pub struct Multipart<R> {
    boundary: Boundary,
    config: MultipartConfig,
    stage: Stage<R>,
    preamble_taken: bool,
    parts_taken: bool,
    yielded: usize,
}

impl<R> Multipart<R> {
    /// Creates a splitter over `reader` for the boundary token `boundary`
    /// (without the leading dashes).
    pub fn new(reader: R, boundary: impl AsRef<[u8]>) -> Self {
        Self::from_boundary(reader, Boundary::new(boundary), MultipartConfig::default())
    }

    /// Creates a splitter with explicit validated configuration.
    pub fn with_config(
        reader: R,
        boundary: impl AsRef<[u8]>,
        config: MultipartConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_boundary(reader, Boundary::new(boundary), config))
    }

    /// Creates a splitter using the boundary of a multipart `Content-Type` value.
    pub fn from_content_type(reader: R, content_type: &str) -> Result<Self, ParseError> {
        let boundary = extract_multipart_boundary(content_type)?;
        Ok(Self::new(reader, boundary))
    }

    fn from_boundary(reader: R, boundary: Boundary, config: MultipartConfig) -> Self {
        let bounded = DelimiterScanner::new(reader, boundary.closing().clone());
        let preamble = DelimiterScanner::new(bounded, boundary.opening().clone());

        Self {
            boundary,
            config,
            stage: Stage::Preamble(preamble),
            preamble_taken: false,
            parts_taken: false,
            yielded: 0,
        }
    }

    /// Returns the boundary and its derived delimiters.
    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &MultipartConfig {
        &self.config
    }

    /// Number of parts handed out so far.
    pub fn parts_yielded(&self) -> usize {
        self.yielded
    }

    /// Returns the preamble: the bytes before the first `--B\r\n`.
    ///
    /// Fails if the preamble was already requested or the parts sequence was.
    pub fn preamble(&mut self) -> Result<Preamble<'_, R>, StateError> {
        if self.preamble_taken || self.parts_taken {
            return Err(StateError::PreambleUnavailable);
        }

        match &mut self.stage {
            Stage::Preamble(scanner) => {
                self.preamble_taken = true;
                Ok(Preamble { scanner })
            }
            _ => Err(StateError::PreambleUnavailable),
        }
    }

    /// Returns the forward-only sequence of parts.
    ///
    /// Fails if called a second time.
    pub fn parts(&mut self) -> Result<Parts<'_, R>, StateError> {
        if self.parts_taken {
            return Err(StateError::PartsUnavailable);
        }

        self.parts_taken = true;
        Ok(Parts { message: self })
    }
}

impl<R: Read> Multipart<R> {
    /// Ends part traversal and returns the bytes after the closing `\r\n--B--`.
    ///
    /// Unread preamble and part bytes are discarded. When the closing
    /// delimiter never occurs the epilogue is empty.
    pub fn into_epilogue(self) -> Result<Epilogue<R>, MultipartError> {
        let mut bounded = match self.stage {
            Stage::Preamble(scanner) => scanner.into_remaining()?,
            Stage::Body(body) => body.into_inner().into_remaining()?,
            Stage::Exhausted(rest) => rest,
            Stage::Poisoned => return Err(StateError::Poisoned.into()),
        };

        io::copy(&mut bounded, &mut io::sink())?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            parts = self.yielded,
            closing_found = bounded.get_ref().delimiter_found(),
            "multipart: epilogue requested"
        );

        Ok(Epilogue {
            source: bounded.into_inner().into_remaining()?,
        })
    }

    fn next_part(&mut self) -> Result<Option<Part<'_, R>>, MultipartError> {
        let Some(headers) = self.advance()? else {
            return Ok(None);
        };

        let index = self.yielded - 1;
        match &mut self.stage {
            Stage::Body(body) => Ok(Some(Part::new(index, headers, body))),
            _ => Err(StateError::Poisoned.into()),
        }
    }

    // Moves past the current segment. Returns the headers of the next part, or
    // `None` once the current segment did not end on an inter-part delimiter.
    fn advance(&mut self) -> Result<Option<Headers>, MultipartError> {
        let mut segment = match mem::replace(&mut self.stage, Stage::Poisoned) {
            Stage::Preamble(scanner) => scanner,
            Stage::Body(mut body) => {
                io::copy(&mut body, &mut io::sink())?;
                body.into_inner()
            }
            Stage::Exhausted(rest) => {
                self.stage = Stage::Exhausted(rest);
                return Ok(None);
            }
            Stage::Poisoned => return Err(StateError::Poisoned.into()),
        };

        segment.drain()?;
        let continues = segment.delimiter_found();
        let rest = segment.into_remaining()?;

        if !continues {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                parts = self.yielded,
                closing_found = rest.get_ref().delimiter_found(),
                "multipart: no more parts"
            );
            self.stage = Stage::Exhausted(rest);
            return Ok(None);
        }

        if !self.config.limits.allows_part(self.yielded) {
            self.stage = Stage::Exhausted(rest);
            return Err(MultipartError::PartsLimitExceeded {
                max_parts: self.config.limits.max_parts.unwrap_or(self.yielded),
            });
        }

        let scanner = DelimiterScanner::with_source(rest, self.boundary.inter_part().clone());
        let (headers, body) = parse_header_block(scanner, &self.config.limits)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            index = self.yielded,
            headers = headers.len(),
            "multipart: part yielded"
        );

        self.stage = Stage::Body(body);
        self.yielded += 1;
        Ok(Some(headers))
    }
}

/// Preamble of a message, borrowed from [`Multipart::preamble`].
#[derive(Debug)]
pub struct Preamble<'a, R> {
    scanner: &'a mut Segment<R>,
}

impl<R: Read> Read for Preamble<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.scanner.read(buf)
    }
}

/// Forward-only sequence of parts, borrowed from [`Multipart::parts`].
///
/// Each part borrows the sequence, so at most one part is alive at a time.
/// Advancing discards whatever of the previous part body was not read.
#[derive(Debug)]
pub struct Parts<'a, R> {
    message: &'a mut Multipart<R>,
}

impl<R: Read> Parts<'_, R> {
    /// Reads the headers of the next part and returns it, or `None` when the
    /// message has no more parts.
    pub fn next_part(&mut self) -> Result<Option<Part<'_, R>>, MultipartError> {
        self.message.next_part()
    }

    /// Number of parts handed out so far.
    pub fn parts_yielded(&self) -> usize {
        self.message.yielded
    }
}

/// Bytes following the closing delimiter of a message.
#[derive(Debug)]
pub struct Epilogue<R> {
    source: PushbackReader<R>,
}

impl<R> Epilogue<R> {
    /// Returns the underlying source, positioned where the epilogue continues.
    pub fn into_source(self) -> PushbackReader<R> {
        self.source
    }
}

impl<R: Read> Read for Epilogue<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.source.read(buf)
    }
}
