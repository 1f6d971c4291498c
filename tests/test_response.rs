use rangeserve::http::range::ByteRange;
use rangeserve::http::response::{Response, ResponseBuilder, StatusCode};

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::PartialContent.as_u16(), 206);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
    assert_eq!(StatusCode::MethodNotAllowed.as_u16(), 405);
    assert_eq!(StatusCode::RangeNotSatisfiable.as_u16(), 416);
    assert_eq!(StatusCode::InternalServerError.as_u16(), 500);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::PartialContent.reason_phrase(), "Partial Content");
    assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    assert_eq!(
        StatusCode::MethodNotAllowed.reason_phrase(),
        "Method Not Allowed"
    );
    assert_eq!(
        StatusCode::RangeNotSatisfiable.reason_phrase(),
        "Range Not Satisfiable"
    );
    assert_eq!(
        StatusCode::InternalServerError.reason_phrase(),
        "Internal Server Error"
    );
}

#[test]
fn test_response_builder_auto_content_length_first() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "text/plain")
        .body(b"This is the body".to_vec())
        .build();

    assert_eq!(response.headers[0].0, "Content-Length");
    assert_eq!(response.header("content-length"), Some("16"));
}

#[test]
fn test_response_builder_header_replaces() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Connection", "keep-alive")
        .header("connection", "close")
        .build();

    assert_eq!(response.headers.len(), 2); // Connection + auto Content-Length
    assert_eq!(response.header("Connection"), Some("close"));
}

#[test]
fn test_response_ok_headers() {
    let response = Response::ok(vec![b'x'; 100], "text/plain; charset=utf-8", true);

    assert_eq!(response.status, StatusCode::Ok);
    let names: Vec<&str> = response.headers.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(names, ["Content-Length", "Content-Type", "Connection"]);
    assert_eq!(response.header("Content-Length"), Some("100"));
    assert_eq!(response.header("Connection"), Some("keep-alive"));
    assert!(!response.closes_connection());
}

#[test]
fn test_response_ok_close() {
    let response = Response::ok(b"hi".to_vec(), "text/plain", false);
    assert_eq!(response.header("Connection"), Some("close"));
    assert!(response.closes_connection());
}

#[test]
fn test_response_partial_headers() {
    let range = ByteRange {
        start: 10,
        end: 19,
        total: 100,
    };
    let response = Response::partial(vec![0; 10], "application/octet-stream", &range, true);

    assert_eq!(response.status, StatusCode::PartialContent);
    let names: Vec<&str> = response.headers.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(
        names,
        ["Content-Length", "Content-Type", "Content-Range", "Connection"]
    );
    assert_eq!(response.header("Content-Length"), Some("10"));
    assert_eq!(response.header("Content-Range"), Some("bytes 10-19/100"));
}

#[test]
fn test_error_responses_are_empty_and_close() {
    let responses = [
        Response::not_found(),
        Response::method_not_allowed(),
        Response::range_not_satisfiable(),
        Response::internal_error(),
    ];

    for response in responses {
        assert!(response.status.as_u16() >= 400);
        assert!(response.body.is_empty());
        assert_eq!(response.header("Content-Length"), Some("0"));
        assert_eq!(response.header("Connection"), Some("close"));
        assert_eq!(response.header("Content-Type"), None);
        assert!(response.closes_connection());
    }
}

#[test]
fn test_response_without_connection_header_closes() {
    let response = ResponseBuilder::new(StatusCode::Ok).build();
    assert!(response.closes_connection());
}
