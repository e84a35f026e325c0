/// The three components of an HTTP request line, exactly as received.
///
/// Nothing is normalised: the method is not upper-cased and the path keeps
/// its query string. Headers and body framing are not interpreted at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    /// Request method token (e.g. "GET")
    pub method: String,
    /// Request target (e.g. "/search?q=rust")
    pub path: String,
    /// Protocol version token (e.g. "HTTP/1.1")
    pub version: String,
}

impl RequestLine {
    /// Query string after the first `?`, empty when there is none.
    pub fn query(&self) -> &str {
        self.path
            .split_once('?')
            .map(|(_, query)| query)
            .unwrap_or("")
    }
}
