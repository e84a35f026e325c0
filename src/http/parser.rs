use crate::error::ParseError;
use crate::http::request::RequestLine;

/// Parses the request line out of a single bounded read.
///
/// Only the first line is looked at. It must hold exactly three
/// whitespace-separated tokens; anything else is a
/// [`ParseError::MalformedRequest`]. A request head larger than the read
/// buffer, or split across packets, is not reassembled.
pub fn parse_request_line(buf: &[u8]) -> Result<RequestLine, ParseError> {
    let first = buf
        .split(|b| *b == b'\n' || *b == b'\r')
        .next()
        .unwrap_or_default();

    let line = std::str::from_utf8(first)
        .map_err(|_| ParseError::MalformedRequest(String::from_utf8_lossy(first).into_owned()))?
        .trim_end_matches(['\r', '\n']);

    let mut parts = line.split_ascii_whitespace();

    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(method), Some(path), Some(version), None) => Ok(RequestLine {
            method: method.to_string(),
            path: path.to_string(),
            version: version.to_string(),
        }),
        _ => Err(ParseError::MalformedRequest(line.to_string())),
    }
}
