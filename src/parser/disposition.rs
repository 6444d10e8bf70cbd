use crate::error::ParseError;

/// Parsed `Content-Disposition` value of a part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDisposition {
    /// Lowercased disposition type, for example `form-data` or `attachment`.
    pub disposition: String,
    /// The `name` parameter.
    pub name: Option<String>,
    /// The `filename*` parameter if present, otherwise `filename`.
    pub filename: Option<String>,
}

/// Parses a `Content-Disposition` header value.
///
/// Parameter values may be tokens or quoted strings. `filename*` uses the
/// RFC 5987 `charset'language'percent-encoded` form and only UTF-8 is
/// accepted. Unknown parameters are ignored.
pub fn parse_content_disposition(value: &str) -> Result<ContentDisposition, ParseError> {
    let mut cursor = Cursor::new(value);

    let disposition = cursor.take_until(b';').trim().to_ascii_lowercase();
    if disposition.is_empty() {
        return Err(ParseError::new("invalid Content-Disposition header"));
    }

    let mut name = None;
    let mut filename = None;
    let mut filename_ext = None;

    while cursor.eat(b';') {
        cursor.skip_whitespace();
        if cursor.is_done() {
            break;
        }

        let key = cursor.take_until(b'=').trim().to_ascii_lowercase();
        if !cursor.eat(b'=') || key.is_empty() || key.contains(';') {
            return Err(ParseError::new(
                "invalid Content-Disposition parameter format",
            ));
        }
        let raw = cursor.parameter_value()?;

        match key.as_str() {
            "name" => name = Some(raw),
            "filename" => filename = Some(decode_filename(&raw)?),
            "filename*" => filename_ext = Some(decode_ext_value(&raw)?),
            _ => {}
        }
    }

    Ok(ContentDisposition {
        disposition,
        name,
        filename: filename_ext.or(filename),
    })
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn is_done(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.rest().as_bytes().first() == Some(&byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    // Stops before `stop` or at the end of input.
    fn take_until(&mut self, stop: u8) -> &'a str {
        let rest = self.rest();
        let end = rest.bytes().position(|byte| byte == stop).unwrap_or(rest.len());
        self.pos += end;
        &rest[..end]
    }

    fn parameter_value(&mut self) -> Result<String, ParseError> {
        self.skip_whitespace();
        if !self.eat(b'"') {
            let token = self.take_until(b';').trim();
            if token.contains('"') {
                return Err(ParseError::new("invalid quoted parameter value"));
            }
            return Ok(token.to_owned());
        }

        let mut out = String::new();
        let mut chars = self.rest().char_indices();
        while let Some((offset, ch)) = chars.next() {
            match ch {
                '"' => {
                    self.pos += offset + 1;
                    let trailing = self.take_until(b';');
                    if !trailing.trim().is_empty() {
                        return Err(ParseError::new("invalid quoted parameter value"));
                    }
                    return Ok(out);
                }
                '\\' => match chars.next() {
                    Some((_, escaped)) => out.push(escaped),
                    None => break,
                },
                _ => out.push(ch),
            }
        }

        Err(ParseError::new("unterminated quoted parameter value"))
    }
}

fn decode_filename(value: &str) -> Result<String, ParseError> {
    if !value.contains('%') {
        return Ok(value.to_owned());
    }
    percent_decode(value, "filename")
}

fn decode_ext_value(value: &str) -> Result<String, ParseError> {
    let mut pieces = value.splitn(3, '\'');
    let (Some(charset), Some(_language), Some(encoded)) =
        (pieces.next(), pieces.next(), pieces.next())
    else {
        return Err(ParseError::new("invalid filename* parameter encoding"));
    };

    if !charset.eq_ignore_ascii_case("utf-8") {
        return Err(ParseError::new("only UTF-8 filename* charset is supported"));
    }
    percent_decode(encoded, "filename*")
}

fn percent_decode(value: &str, what: &str) -> Result<String, ParseError> {
    let invalid = || ParseError::new(format!("invalid percent-encoding in {what}"));
    let raw = value.as_bytes();
    let mut bytes = Vec::with_capacity(raw.len());
    let mut index = 0;

    while index < raw.len() {
        if raw[index] != b'%' {
            bytes.push(raw[index]);
            index += 1;
            continue;
        }

        let hex = raw
            .get(index + 1..index + 3)
            .filter(|hex| hex.iter().all(u8::is_ascii_hexdigit))
            .ok_or_else(invalid)?;
        let hex = std::str::from_utf8(hex).map_err(|_| invalid())?;
        bytes.push(u8::from_str_radix(hex, 16).map_err(|_| invalid())?);
        index += 3;
    }

    String::from_utf8(bytes).map_err(|_| ParseError::new(format!("{what} is not valid UTF-8")))
}
