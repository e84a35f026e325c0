use conduit::error::ParseError;
use conduit::http::parser::parse_request_line;

#[test]
fn test_parse_simple_get_request() {
    let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let parsed = parse_request_line(req).unwrap();

    assert_eq!(parsed.method, "GET");
    assert_eq!(parsed.path, "/");
    assert_eq!(parsed.version, "HTTP/1.1");
}

#[test]
fn test_parse_returns_components_unmodified() {
    let lines = [
        ("POST", "/api/items", "HTTP/1.0"),
        ("get", "/lower", "HTTP/1.1"),
        ("BREW", "/pot-0", "HTCPCP/1.0"),
        ("DELETE", "*", "HTTP/1.1"),
    ];

    for (method, path, version) in lines {
        let req = format!("{method} {path} {version}\r\n\r\n");
        let parsed = parse_request_line(req.as_bytes()).unwrap();
        assert_eq!(parsed.method, method);
        assert_eq!(parsed.path, path);
        assert_eq!(parsed.version, version);
    }
}

#[test]
fn test_parse_request_with_path_and_query_string() {
    let req = b"GET /search?q=rust HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let parsed = parse_request_line(req).unwrap();

    assert_eq!(parsed.path, "/search?q=rust");
    assert_eq!(parsed.query(), "q=rust");
}

#[test]
fn test_parse_bare_lf_line_ending() {
    let parsed = parse_request_line(b"GET /lf HTTP/1.1\nHost: x\n\n").unwrap();
    assert_eq!(parsed.version, "HTTP/1.1");
}

#[test]
fn test_parse_line_without_terminator() {
    let parsed = parse_request_line(b"GET /partial HTTP/1.1").unwrap();
    assert_eq!(parsed.path, "/partial");
}

#[test]
fn test_parse_ignores_headers_and_body() {
    let req = b"PUT /x HTTP/1.1\r\nBroken header line\r\nContent-Length: nope\r\n\r\nbody";
    let parsed = parse_request_line(req).unwrap();

    assert_eq!(parsed.method, "PUT");
    assert_eq!(parsed.path, "/x");
}

#[test]
fn test_parse_tolerates_repeated_whitespace() {
    let parsed = parse_request_line(b"GET \t /spaced   HTTP/1.1\r\n").unwrap();
    assert_eq!(parsed.path, "/spaced");
}

#[test]
fn test_parse_keeps_non_ascii_whitespace_in_path() {
    let req = "GET /a\u{a0}b HTTP/1.1\r\n\r\n";
    let parsed = parse_request_line(req.as_bytes()).unwrap();

    assert_eq!(parsed.path, "/a\u{a0}b");
    assert_eq!(parsed.version, "HTTP/1.1");
}

#[test]
fn test_parse_too_few_tokens() {
    for req in [&b"GET /\r\n\r\n"[..], b"GET\r\n", b"\r\n", b""] {
        assert!(matches!(
            parse_request_line(req),
            Err(ParseError::MalformedRequest(_))
        ));
    }
}

#[test]
fn test_parse_too_many_tokens() {
    let result = parse_request_line(b"GET / HTTP/1.1 extra\r\n\r\n");
    assert!(matches!(result, Err(ParseError::MalformedRequest(_))));
}

#[test]
fn test_parse_non_utf8_request_line() {
    let result = parse_request_line(b"GET /\xff\xfe HTTP/1.1\r\n\r\n");
    assert!(matches!(result, Err(ParseError::MalformedRequest(_))));
}
