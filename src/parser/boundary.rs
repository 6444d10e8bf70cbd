use bytes::{BufMut, Bytes, BytesMut};

use crate::{error::ParseError, parser::delimiter::Delimiter};

/// Boundary token of a multipart message and the wire delimiters built from it.
///
/// For a token `B` the delimiters are:
///
/// * opening: `--B\r\n`, ending the preamble,
/// * inter-part: `\r\n--B\r\n`, separating parts,
/// * closing: `\r\n--B--`, ending the last part.
///
/// The token is opaque; it is not checked against RFC 2046 character rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary {
    token: Bytes,
    opening: Delimiter,
    inter_part: Delimiter,
    closing: Delimiter,
}

impl Boundary {
    /// Derives the wire delimiters for `token` (given without leading dashes).
    pub fn new(token: impl AsRef<[u8]>) -> Self {
        let token = Bytes::copy_from_slice(token.as_ref());
        Self {
            opening: join(&[&b"--"[..], &token[..], &b"\r\n"[..]]),
            inter_part: join(&[&b"\r\n--"[..], &token[..], &b"\r\n"[..]]),
            closing: join(&[&b"\r\n--"[..], &token[..], &b"--"[..]]),
            token,
        }
    }

    /// Returns the raw boundary token.
    pub fn token(&self) -> &[u8] {
        &self.token
    }

    /// Delimiter ending the preamble and opening the first part.
    pub fn opening(&self) -> &Delimiter {
        &self.opening
    }

    /// Delimiter between two consecutive parts.
    pub fn inter_part(&self) -> &Delimiter {
        &self.inter_part
    }

    /// Delimiter ending the last part.
    pub fn closing(&self) -> &Delimiter {
        &self.closing
    }
}

fn join(pieces: &[&[u8]]) -> Delimiter {
    let mut out = BytesMut::with_capacity(pieces.iter().map(|piece| piece.len()).sum());
    for piece in pieces {
        out.put_slice(piece);
    }
    Delimiter::from_nonempty(out.freeze())
}

/// Extracts the `boundary` parameter from a multipart `Content-Type` value.
///
/// Any `multipart/*` subtype is accepted.
pub fn extract_multipart_boundary(content_type: &str) -> Result<String, ParseError> {
    let mime = content_type
        .parse::<mime::Mime>()
        .map_err(|_| ParseError::new("invalid Content-Type header"))?;

    if mime.type_() != mime::MULTIPART {
        return Err(ParseError::new("Content-Type must be a multipart type"));
    }

    let boundary = mime
        .get_param(mime::BOUNDARY)
        .map(|value| value.as_str())
        .ok_or_else(|| ParseError::new("missing multipart boundary parameter"))?;

    if boundary.is_empty() {
        return Err(ParseError::new("multipart boundary cannot be empty"));
    }

    Ok(boundary.to_owned())
}
