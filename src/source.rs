use std::{
    collections::VecDeque,
    io::{self, Read},
};

/// Byte source with a pushback capability.
///
/// Bytes handed to [`PushbackReader::unread`] are served again, in order,
/// before any further byte from the wrapped reader. Scanners use this to
/// return bytes they read past a delimiter so the next stage observes them
/// exactly once.
#[derive(Debug)]
pub struct PushbackReader<R> {
    inner: R,
    pending: VecDeque<u8>,
}

impl<R> PushbackReader<R> {
    /// Wraps `inner` with an empty pushback buffer.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            pending: VecDeque::new(),
        }
    }

    /// Pushes `bytes` back so they are read next.
    ///
    /// They are placed ahead of any previously pushed-back bytes that have
    /// not been read yet.
    pub fn unread(&mut self, bytes: &[u8]) {
        self.pending.reserve(bytes.len());
        for &byte in bytes.iter().rev() {
            self.pending.push_front(byte);
        }
    }

    /// Number of pushed-back bytes still waiting to be read.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Returns a reference to the wrapped reader.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Returns a mutable reference to the wrapped reader.
    ///
    /// Reading through it directly skips any pending pushed-back bytes.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Unwraps the reader. Pending pushed-back bytes are discarded.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> PushbackReader<R> {
    /// Returns `true` when no more bytes can be read.
    ///
    /// Pulls at most one byte ahead and pushes it back.
    pub fn at_end(&mut self) -> io::Result<bool> {
        if !self.pending.is_empty() {
            return Ok(false);
        }

        let mut probe = [0u8; 1];
        match self.inner.read(&mut probe)? {
            0 => Ok(true),
            _ => {
                self.pending.push_front(probe[0]);
                Ok(false)
            }
        }
    }
}

impl<R: Read> Read for PushbackReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        if self.pending.is_empty() {
            return self.inner.read(buf);
        }

        let (front, _) = self.pending.as_slices();
        let n = front.len().min(buf.len());
        buf[..n].copy_from_slice(&front[..n]);
        self.pending.drain(..n);
        Ok(n)
    }
}
