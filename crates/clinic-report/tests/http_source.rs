//! HTTP productivity source against a throwaway local server

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use clinic_report::{aggregate, HttpProductivitySource, ProductivitySource, SourceError};
use clinic_report_core::Employee;

/// Serve one canned HTTP response, returning the base URL and the request line
fn serve_once(status: &str, body: &str) -> (String, thread::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}/api", listener.local_addr().unwrap());
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream);
        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            if line == "\r\n" || line.is_empty() {
                break;
            }
        }
        reader.get_mut().write_all(response.as_bytes()).unwrap();
        request_line
    });
    (base, handle)
}

#[tokio::test]
async fn test_fetch_success() {
    let (base, server) = serve_once(
        "200 OK",
        r#"{"total_citas": 10, "citas_completadas": 8, "total_ingresos": 400000,
            "especialidades": {"Cardiología": 5}, "citas": []}"#,
    );
    let source = HttpProductivitySource::new(&base, Duration::from_secs(5)).unwrap();

    let payload = source.fetch(7, 10, 2026).await.unwrap();
    assert_eq!(payload.scheduled, 10);
    assert_eq!(payload.completed, 8);
    assert_eq!(payload.revenue, 400000.0);

    let request_line = server.join().unwrap();
    assert!(request_line.starts_with("GET /api/empleados/7/productividad?"));
    assert!(request_line.contains("mes=10"));
    assert!(request_line.contains("anio=2026"));
}

#[tokio::test]
async fn test_fetch_error_status() {
    let (base, server) = serve_once("500 Internal Server Error", "{}");
    let source = HttpProductivitySource::new(&base, Duration::from_secs(5)).unwrap();

    let err = source.fetch(7, 10, 2026).await.unwrap_err();
    assert!(matches!(err, SourceError::Status(500)));
    server.join().unwrap();
}

#[tokio::test]
async fn test_fetch_malformed_body() {
    let (base, server) = serve_once("200 OK", "<html>login</html>");
    let source = HttpProductivitySource::new(&base, Duration::from_secs(5)).unwrap();

    let err = source.fetch(7, 10, 2026).await.unwrap_err();
    assert!(matches!(err, SourceError::Malformed(_)));
    server.join().unwrap();
}

#[tokio::test]
async fn test_aggregate_degrades_on_http_failure() {
    let (base, server) = serve_once("404 Not Found", "{}");
    let source = HttpProductivitySource::new(&base, Duration::from_secs(5)).unwrap();

    let data = aggregate(&source, &Employee::new(7, "Ana", "Pérez"), 10, 2026).await;
    assert!(data.degraded);
    assert_eq!(data.period.scheduled, 0);
    assert!(data.appointments.is_empty());
    server.join().unwrap();
}
