use axum::http::{HeaderMap, HeaderValue};
use call_quality::infrastructure::observability::{REQUEST_ID_HEADER, RequestId};

fn headers_with(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(REQUEST_ID_HEADER, HeaderValue::from_str(value).unwrap());
    headers
}

#[test]
fn given_caller_supplied_id_when_reading_headers_then_reuses_it() {
    let request_id = RequestId::from_headers(&headers_with("crm-req-42"));
    assert_eq!(request_id.as_str(), "crm-req-42");
}

#[test]
fn given_no_header_when_reading_headers_then_generates_uuid() {
    let request_id = RequestId::from_headers(&HeaderMap::new());
    assert!(uuid::Uuid::parse_str(request_id.as_str()).is_ok());
}

#[test]
fn given_blank_header_when_reading_headers_then_generates_uuid() {
    let request_id = RequestId::from_headers(&headers_with("   "));
    assert!(uuid::Uuid::parse_str(request_id.as_str()).is_ok());
}

#[test]
fn given_oversized_header_when_reading_headers_then_replaces_it() {
    let long = "x".repeat(500);
    let request_id = RequestId::from_headers(&headers_with(&long));
    assert_ne!(request_id.as_str(), long);
    assert!(uuid::Uuid::parse_str(request_id.as_str()).is_ok());
}

#[test]
fn given_id_with_inner_space_when_reading_headers_then_replaces_it() {
    let request_id = RequestId::from_headers(&headers_with("a b"));
    assert_ne!(request_id.as_str(), "a b");
}

#[test]
fn given_request_id_when_displayed_then_prints_raw_value() {
    assert_eq!(RequestId("abc".to_string()).to_string(), "abc");
}
