use std::io::{self, Read};

use crate::{parser::delimiter::Delimiter, source::PushbackReader};

/// Bounded reader over a byte source that stops before the first delimiter.
///
/// The scanner keeps a search window of twice the delimiter length. Bytes
/// closer than one delimiter length to the populated end of the window are
/// never handed out before the window has been refilled and searched again,
/// so an occurrence straddling two reads from the source is still found.
/// Memory use is independent of how many bytes pass through.
///
/// When the delimiter is located, any bytes read past its end are pushed back
/// onto the source. [`DelimiterScanner::into_remaining`] then yields a source
/// positioned at the first byte after the delimiter.
#[derive(Debug)]
pub struct DelimiterScanner<R> {
    source: PushbackReader<R>,
    delimiter: Delimiter,
    window: Vec<u8>,
    cursor: usize,
    filled: usize,
    located: Option<usize>,
    primed: bool,
    exhausted: bool,
    closed: bool,
}

impl<R> DelimiterScanner<R> {
    /// Creates a scanner reading from `source` up to `delimiter`.
    pub fn new(source: R, delimiter: Delimiter) -> Self {
        Self::with_source(PushbackReader::new(source), delimiter)
    }

    /// Creates a scanner over a source that may already hold pushed-back bytes.
    ///
    /// This is how a chain continues from [`DelimiterScanner::into_remaining`]
    /// without wrapping the source a second time.
    pub fn with_source(source: PushbackReader<R>, delimiter: Delimiter) -> Self {
        Self {
            source,
            delimiter,
            window: Vec::new(),
            cursor: 0,
            filled: 0,
            located: None,
            primed: false,
            exhausted: false,
            closed: false,
        }
    }

    /// Returns the delimiter this scanner stops at.
    pub fn delimiter(&self) -> &Delimiter {
        &self.delimiter
    }

    /// Returns `true` once the delimiter has been detected in the source.
    ///
    /// Detection happens ahead of consumption: bytes preceding the delimiter
    /// may still be readable.
    pub fn delimiter_found(&self) -> bool {
        self.located.is_some()
    }

    /// Returns `true` once this scanner can produce no more bytes.
    pub fn is_finished(&self) -> bool {
        self.closed
    }

    /// Returns a reference to the underlying source.
    pub fn get_ref(&self) -> &R {
        self.source.get_ref()
    }

    fn close(&mut self) {
        self.closed = true;
        self.cursor = 0;
        self.filled = 0;
        self.window = Vec::new();

        #[cfg(feature = "tracing")]
        tracing::trace!(
            delimiter_len = self.delimiter.len(),
            found = self.located.is_some(),
            "scanner: released window"
        );
    }

    fn serve(&mut self, buf: &mut [u8], limit: usize) -> usize {
        let n = buf.len().min(limit - self.cursor);
        buf[..n].copy_from_slice(&self.window[self.cursor..self.cursor + n]);
        self.cursor += n;

        let at_boundary = self.located == Some(self.cursor);
        let at_end = self.exhausted && self.located.is_none() && self.cursor == self.filled;
        if at_boundary || at_end {
            self.close();
        }
        n
    }
}

impl<R: Read> DelimiterScanner<R> {
    /// Reads a single byte through the regular read path.
    pub fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        match self.read(&mut byte)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }

    /// Discards every remaining byte before the delimiter.
    ///
    /// Returns the number of bytes discarded.
    pub fn drain(&mut self) -> io::Result<u64> {
        io::copy(self, &mut io::sink())
    }

    /// Drains this scanner and returns the source positioned right after the
    /// delimiter, or at end-of-data when the delimiter never occurred.
    pub fn into_remaining(mut self) -> io::Result<PushbackReader<R>> {
        self.drain()?;
        Ok(self.source)
    }

    fn refill(&mut self) -> io::Result<()> {
        if self.cursor > 0 {
            self.window.copy_within(self.cursor..self.filled, 0);
            self.filled -= self.cursor;
            self.cursor = 0;
        }

        while self.filled < self.window.len() {
            match self.source.read(&mut self.window[self.filled..])? {
                0 => {
                    self.exhausted = true;
                    break;
                }
                n => self.filled += n,
            }
        }

        if let Some(at) = self.delimiter.find(&self.window[..self.filled]) {
            let end = at + self.delimiter.len();
            self.source.unread(&self.window[end..self.filled]);

            #[cfg(feature = "tracing")]
            tracing::trace!(
                delimiter_len = self.delimiter.len(),
                offset = at,
                pushed_back = self.filled - end,
                "scanner: delimiter located"
            );

            self.filled = end;
            self.located = Some(at);
        }

        Ok(())
    }
}

impl<R: Read> Read for DelimiterScanner<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() || self.closed {
            return Ok(0);
        }

        if !self.primed {
            self.primed = true;
            self.window = vec![0; self.delimiter.len() * 2];
            self.refill()?;
        }

        loop {
            if let Some(at) = self.located {
                if self.cursor < at {
                    return Ok(self.serve(buf, at));
                }
                self.close();
                return Ok(0);
            }

            if self.exhausted {
                if self.cursor < self.filled {
                    let filled = self.filled;
                    return Ok(self.serve(buf, filled));
                }
                self.close();
                return Ok(0);
            }

            let limit = self.filled.saturating_sub(self.delimiter.len());
            if self.cursor < limit {
                return Ok(self.serve(buf, limit));
            }

            self.refill()?;
        }
    }
}
