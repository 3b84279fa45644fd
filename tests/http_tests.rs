//! Request framing over chunked and truncated streams.

mod common;

use common::{Journal, MockStream};
use embassy_futures::block_on;
use rgb_pwm_node::core::net::http::{
    BODY_MAX_LEN, Error, FramingError, LINE_MAX_LEN, PATH_MAX_LEN, Request,
    RequestReader,
};

fn read(stream: &mut MockStream) -> Result<Request, Error> {
    block_on(RequestReader::new(stream).read_request())
}

#[test]
fn reads_path_and_exact_body() {
    let journal = Journal::new();
    let mut stream = MockStream::new(
        &journal,
        b"POST /light HTTP/1.1\r\nHost: node\r\n\
          Content-Length: 2\r\n\r\n{}trailing",
    );

    let request = read(&mut stream).unwrap();

    assert_eq!(request.path.as_str(), "/light");
    assert_eq!(request.content_length, 2);
    assert_eq!(request.body.as_slice(), b"{}");
    assert_eq!(stream.unread(), b"trailing");
}

#[test]
fn long_path_is_cut_to_fit() {
    let journal = Journal::new();
    let path = format!("/{}", "p".repeat(PATH_MAX_LEN + 20));
    let input =
        format!("POST {path} HTTP/1.1\r\nContent-Length: 2\r\n\r\n{{}}");
    let mut stream = MockStream::new(&journal, input.as_bytes());

    let request = read(&mut stream).unwrap();

    assert_eq!(request.path.as_str(), &path[..PATH_MAX_LEN]);
    assert_eq!(request.body.as_slice(), b"{}");
}

#[test]
fn one_byte_reads_frame_the_same_request() {
    let journal = Journal::new();
    let input =
        b"POST / HTTP/1.1\r\ncontent-length: 13\r\n\r\n{\"cmd\":\"demo\"}";
    let mut stream = MockStream::chunked(&journal, input, 1);

    let request = read(&mut stream).unwrap();

    assert_eq!(request.body.as_slice(), b"{\"cmd\":\"demo\"");
}

#[test]
fn header_name_is_case_insensitive() {
    let journal = Journal::new();
    let input = b"POST / HTTP/1.1\r\nCONTENT-LENGTH: 3\r\n\r\nabc";
    let mut stream = MockStream::new(&journal, input);

    assert_eq!(read(&mut stream).unwrap().body.as_slice(), b"abc");
}

#[test]
fn missing_content_length_means_empty_body() {
    let journal = Journal::new();
    let mut stream = MockStream::new(&journal, b"POST / HTTP/1.1\r\n\r\n{}");

    let request = read(&mut stream).unwrap();

    assert!(request.body.is_empty());
    assert_eq!(stream.unread(), b"{}");
}

#[test]
fn bare_newlines_are_accepted() {
    let journal = Journal::new();
    let input = b"POST / HTTP/1.0\nContent-Length: 2\n\n{}";
    let mut stream = MockStream::new(&journal, input);

    assert_eq!(read(&mut stream).unwrap().body.as_slice(), b"{}");
}

#[test]
fn only_post_is_accepted() {
    let journal = Journal::new();
    let inputs = [
        &b"GET / HTTP/1.1\r\n\r\n"[..],
        b"post / HTTP/1.1\r\n\r\n",
        b"\r\n",
    ];
    for input in inputs {
        let mut stream = MockStream::new(&journal, input);
        assert_eq!(
            read(&mut stream).unwrap_err(),
            Error::Framing(FramingError::BadMethod)
        );
    }
}

#[test]
fn closed_before_start_line() {
    let journal = Journal::new();
    let mut stream = MockStream::new(&journal, b"");

    assert_eq!(
        read(&mut stream).unwrap_err(),
        Error::Framing(FramingError::Closed)
    );
}

#[test]
fn closed_in_headers_yields_empty_body() {
    let journal = Journal::new();
    let input = b"POST / HTTP/1.1\r\nContent-Length: 40\r\n";
    let mut stream = MockStream::new(&journal, input);

    let request = read(&mut stream).unwrap();

    assert!(request.body.is_empty());
}

#[test]
fn closed_in_body_keeps_what_arrived() {
    let journal = Journal::new();
    let input = b"POST / HTTP/1.1\r\nContent-Length: 40\r\n\r\n{\"cmd\"";
    let mut stream = MockStream::new(&journal, input);

    let request = read(&mut stream).unwrap();

    assert_eq!(request.content_length, 40);
    assert_eq!(request.body.as_slice(), b"{\"cmd\"");
}

#[test]
fn overlong_line_is_rejected() {
    let journal = Journal::new();
    let mut input = b"POST / HTTP/1.1\r\nX-Pad: ".to_vec();
    input.extend(std::iter::repeat_n(b'a', LINE_MAX_LEN));
    input.extend_from_slice(b"\r\n\r\n");
    let mut stream = MockStream::new(&journal, &input);

    assert_eq!(
        read(&mut stream).unwrap_err(),
        Error::Framing(FramingError::LineTooLong)
    );
}

#[test]
fn oversized_body_is_rejected() {
    let journal = Journal::new();
    let header = format!(
        "POST / HTTP/1.1\r\nContent-Length: {}\r\n\r\n",
        BODY_MAX_LEN + 1
    );
    let mut stream = MockStream::new(&journal, header.as_bytes());

    assert_eq!(
        read(&mut stream).unwrap_err(),
        Error::Framing(FramingError::BodyTooLarge)
    );
}

#[test]
fn non_numeric_content_length_is_rejected() {
    let journal = Journal::new();
    let input = b"POST / HTTP/1.1\r\nContent-Length: ten\r\n\r\n";
    let mut stream = MockStream::new(&journal, input);

    assert_eq!(
        read(&mut stream).unwrap_err(),
        Error::Framing(FramingError::BadContentLength)
    );
}
