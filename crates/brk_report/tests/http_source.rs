use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread;

use brk_report::model::{
    BreakCategory, ComparisonFilter, ComparisonRow, ReportRequest, ReportRows,
};
use brk_report::source::{HttpReportSource, ReportSource};
use pretty_assertions::assert_eq;
use time::macros::date;

struct Captured {
    request_line: String,
    body: String,
}

/// Answers exactly one HTTP request with a canned response.
fn serve_once(status_line: &'static str, body: String) -> (String, thread::JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream.try_clone().expect("clone"));

        let mut request_line = String::new();
        reader.read_line(&mut request_line).expect("request line");
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).expect("header");
            if line == "\r\n" || line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.trim().eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().expect("length");
                }
            }
        }
        let mut request_body = vec![0u8; content_length];
        reader.read_exact(&mut request_body).expect("body");

        let response = format!(
            "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).expect("write");
        stream.flush().expect("flush");

        Captured {
            request_line: request_line.trim_end().to_string(),
            body: String::from_utf8(request_body).expect("utf8"),
        }
    });

    (format!("http://{addr}"), handle)
}

fn comparison_request() -> ReportRequest {
    ReportRequest::Comparison(ComparisonFilter {
        date1: date!(2024 - 01 - 02),
        date2: date!(2024 - 01 - 03),
    })
}

#[test]
fn posts_request_and_decodes_rows() {
    let rows = ReportRows::Comparison(vec![ComparisonRow {
        break_category: BreakCategory::Valuation,
        date1_count: 4,
        date2_count: 1,
        delta: -3,
    }]);
    let (base_url, handle) = serve_once("HTTP/1.1 200 OK", serde_json::to_string(&rows).expect("json"));

    let source = HttpReportSource::new(&base_url, 5_000).expect("source");
    let got = source.fetch(&comparison_request()).expect("fetch");
    let captured = handle.join().expect("server");

    assert_eq!(got, rows);
    assert_eq!(captured.request_line, "POST /reports/comparison HTTP/1.1");
    let sent: ReportRequest = serde_json::from_str(&captured.body).expect("request json");
    assert_eq!(sent, comparison_request());
}

#[test]
fn mismatched_report_kind_is_rejected() {
    let rows = ReportRows::TradeBreak(Vec::new());
    let (base_url, handle) = serve_once("HTTP/1.1 200 OK", serde_json::to_string(&rows).expect("json"));

    let source = HttpReportSource::new(&base_url, 5_000).expect("source");
    let err = source.fetch(&comparison_request()).unwrap_err();
    handle.join().expect("server");

    assert_eq!(err.code, "REPORT_KIND_MISMATCH");
    assert!(!err.retryable);
}

#[test]
fn server_errors_are_retryable_client_errors_are_not() {
    let (base_url, handle) = serve_once("HTTP/1.1 503 Service Unavailable", "{}".to_string());
    let source = HttpReportSource::new(&base_url, 5_000).expect("source");
    let err = source.fetch(&comparison_request()).unwrap_err();
    handle.join().expect("server");
    assert_eq!(err.code, "REPORT_FETCH_FAILED");
    assert!(err.retryable);

    let (base_url, handle) = serve_once("HTTP/1.1 400 Bad Request", "{}".to_string());
    let source = HttpReportSource::new(&base_url, 5_000).expect("source");
    let err = source.fetch(&comparison_request()).unwrap_err();
    handle.join().expect("server");
    assert_eq!(err.code, "REPORT_FETCH_FAILED");
    assert!(!err.retryable);
}

#[test]
fn unreachable_endpoint_is_retryable() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr")
    };

    let source = HttpReportSource::new(&format!("http://{addr}"), 2_000).expect("source");
    let err = source.fetch(&comparison_request()).unwrap_err();

    assert_eq!(err.code, "REPORT_UNREACHABLE");
    assert!(err.retryable);
}
