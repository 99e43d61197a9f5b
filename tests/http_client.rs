use crm_dashboard::api::models::{DeleteParams, FetchParams};
use crm_dashboard::config::Credentials;
use crm_dashboard::{ApperClient, CrmError, RecordBackend};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serves one canned response and hands back the raw request it received.
async fn serve_once(status: &'static str, body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut raw = Vec::new();
        let mut chunk = [0_u8; 4096];
        loop {
            let read = socket.read(&mut chunk).await.unwrap();
            if read == 0 {
                break;
            }
            raw.extend_from_slice(&chunk[..read]);
            if request_complete(&raw) {
                break;
            }
        }
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        String::from_utf8_lossy(&raw).into_owned()
    });
    (base_url, handle)
}

fn request_complete(raw: &[u8]) -> bool {
    let text = String::from_utf8_lossy(raw);
    let Some(header_end) = text.find("\r\n\r\n") else {
        return false;
    };
    let content_length = text[..header_end]
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);
    raw.len() >= header_end + 4 + content_length
}

fn client(base_url: &str) -> ApperClient {
    ApperClient::new(
        reqwest::Client::builder().no_proxy().build().unwrap(),
        base_url,
        Credentials {
            project_id: "proj-1".into(),
            public_key: "pk-secret".into(),
        },
    )
    .unwrap()
}

#[tokio::test]
async fn sends_auth_headers_and_sdk_body() {
    let (base_url, server) = serve_once(
        "200 OK",
        json!({"success": true, "data": [{"Id": 1, "name_c": "Ada"}]}).to_string(),
    )
    .await;

    let response = client(&base_url)
        .fetch_records("contact_c", &FetchParams::projection(&["name_c"]).first_page())
        .await
        .unwrap();

    assert!(response.success);
    assert_eq!(response.data, Some(json!([{"Id": 1, "name_c": "Ada"}])));
    let request = server.await.unwrap();
    let lower = request.to_ascii_lowercase();
    assert!(
        lower.starts_with("post /projects/proj-1/tables/contact_c/fetch http/1.1"),
        "{request}"
    );
    assert!(lower.contains("x-apper-project-id: proj-1"));
    assert!(lower.contains("x-apper-public-key: pk-secret"));
    assert!(lower.contains("content-type: application/json"));
    let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
    let body: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(
        body,
        json!({"fields": [{"field": {"Name": "name_c"}}], "pagingInfo": {"limit": 100, "offset": 0}})
    );
}

#[tokio::test]
async fn get_by_id_posts_to_id_route() {
    let (base_url, server) =
        serve_once("200 OK", json!({"success": true, "data": {"Id": 7}}).to_string()).await;

    client(&format!("{base_url}/"))
        .get_record_by_id("deal_c", 7, &FetchParams::projection(&["title_c"]))
        .await
        .unwrap();

    let request = server.await.unwrap();
    assert!(
        request.starts_with("POST /projects/proj-1/tables/deal_c/get/7 HTTP/1.1"),
        "{request}"
    );
}

#[tokio::test]
async fn error_status_becomes_http_error_with_truncated_body() {
    let (base_url, server) = serve_once("500 Internal Server Error", "x".repeat(600)).await;

    let err = client(&base_url)
        .delete_record("activity_c", &DeleteParams { record_ids: vec![3] })
        .await
        .unwrap_err();
    server.await.unwrap();

    match err {
        CrmError::Http { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, format!("{}... (truncated)", "x".repeat(500)));
        }
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn undecodable_success_body_is_unexpected_response() {
    let (base_url, server) = serve_once("200 OK", "<html>maintenance</html>".to_string()).await;

    let err = client(&base_url)
        .fetch_records("deal_c", &FetchParams::projection(&["title_c"]))
        .await
        .unwrap_err();
    server.await.unwrap();

    assert!(matches!(err, CrmError::UnexpectedResponse { operation: "fetch" }));
    assert_eq!(err.to_string(), "Unexpected response format");
}
