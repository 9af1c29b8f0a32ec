use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use myserver::config::Config;
use myserver::http::connection::{Connection, MAX_HEAD_SIZE};
use myserver::http::writer::serialize_response;
use myserver::server::listener;
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};
use tokio::net::{TcpListener, TcpStream};

const SHORT_TIMEOUT: Duration = Duration::from_millis(200);

fn doc_root() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("index.html"), "<h1>home</h1>").unwrap();
    dir
}

type ConnTask = tokio::task::JoinHandle<anyhow::Result<()>>;

fn spawn_connection(root: PathBuf) -> (DuplexStream, ConnTask) {
    spawn_connection_with_timeout(root, SHORT_TIMEOUT)
}

fn spawn_connection_with_timeout(root: PathBuf, read_timeout: Duration) -> (DuplexStream, ConnTask) {
    let (client, server) = tokio::io::duplex(64 * 1024);
    let handle = tokio::spawn(async move {
        let mut conn = Connection::new(server, root, read_timeout);
        conn.run().await
    });
    (client, handle)
}

async fn read_all(client: &mut DuplexStream) -> String {
    let mut out = Vec::new();
    client.read_to_end(&mut out).await.unwrap();
    String::from_utf8_lossy(&out).into_owned()
}

#[tokio::test]
async fn test_serves_file_then_waits_for_next_request() {
    let root = doc_root();
    let (mut client, handle) = spawn_connection(root.path().to_path_buf());

    client
        .write_all(b"GET / HTTP/1.1\r\nHost: x\r\n\r\n")
        .await
        .unwrap();
    client.shutdown().await.unwrap();

    let text = read_all(&mut client).await;
    assert!(text.starts_with("HTTP/1.1 200 OK\r\nServer: Myserver 1.0\r\n"));
    assert!(text.ends_with("\r\n\r\n<h1>home</h1>"));

    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_request_split_across_writes() {
    let root = doc_root();
    let (mut client, handle) = spawn_connection(root.path().to_path_buf());

    client.write_all(b"GET / HTTP/1.1\r\nHo").await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    client.write_all(b"st: x\r\n\r\n").await.unwrap();
    client.shutdown().await.unwrap();

    let text = read_all(&mut client).await;
    assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));

    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_second_cycle_on_same_connection() {
    let root = doc_root();
    let (mut client, handle) = spawn_connection(root.path().to_path_buf());

    let first = b"GET /index.html HTTP/1.1\r\nHost: x\r\n\r\n";
    let (_, expected) = myserver::handle(first, root.path()).unwrap();
    let expected = serialize_response(&expected);

    client.write_all(first).await.unwrap();
    let mut got = vec![0u8; expected.len()];
    client.read_exact(&mut got).await.unwrap();
    assert_eq!(got, expected);

    client
        .write_all(b"GET /missing HTTP/1.1\r\nHost: x\r\n\r\n")
        .await
        .unwrap();

    // Error responses close the connection without waiting for the client
    let text = read_all(&mut client).await;
    assert!(text.starts_with("HTTP/1.1 404 Not Found\r\n"));

    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_bad_request_closes_connection() {
    let root = doc_root();
    let (mut client, handle) = spawn_connection(root.path().to_path_buf());

    client.write_all(b"GET / HTTP/1.1\r\n\r\n").await.unwrap();

    let text = read_all(&mut client).await;
    assert!(text.starts_with("HTTP/1.1 400 Client Error\r\n"));
    assert!(text.contains("<B>400 Request error</B>"));

    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_partial_request_times_out_with_400() {
    let root = doc_root();
    let (mut client, handle) = spawn_connection(root.path().to_path_buf());

    client.write_all(b"GET / HTTP/1.1\r\nHost: x\r\n").await.unwrap();

    let text = read_all(&mut client).await;
    assert!(text.starts_with("HTTP/1.1 400 Client Error\r\n"));

    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_partial_request_then_eof_gets_400() {
    let root = doc_root();
    // Long enough that only the EOF can end the read phase
    let (mut client, handle) =
        spawn_connection_with_timeout(root.path().to_path_buf(), Duration::from_secs(30));

    client.write_all(b"GET / HTTP/1.1\r\nHost: x\r\n").await.unwrap();
    client.shutdown().await.unwrap();

    let text = tokio::time::timeout(Duration::from_secs(5), read_all(&mut client))
        .await
        .unwrap();
    assert!(text.starts_with("HTTP/1.1 400 Client Error\r\n"));

    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_oversized_head_gets_400() {
    let root = doc_root();
    let (client, handle) =
        spawn_connection_with_timeout(root.path().to_path_buf(), Duration::from_secs(30));
    let (mut reader, mut writer) = tokio::io::split(client);

    // Keeps sending without a terminator; writes fail once the server hangs up
    let sender = tokio::spawn(async move {
        let chunk = vec![b'A'; 16 * 1024];
        for _ in 0..(4 * MAX_HEAD_SIZE / chunk.len()) {
            if writer.write_all(&chunk).await.is_err() {
                break;
            }
        }
    });

    let mut out = Vec::new();
    tokio::time::timeout(Duration::from_secs(5), reader.read_to_end(&mut out))
        .await
        .unwrap()
        .unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("HTTP/1.1 400 Client Error\r\n"));
    assert!(text.contains("<B>400 Request error</B>"));

    handle.await.unwrap().unwrap();
    sender.await.unwrap();
}

#[tokio::test]
async fn test_silent_client_gets_no_response() {
    let root = doc_root();
    let (mut client, handle) = spawn_connection(root.path().to_path_buf());

    let text = read_all(&mut client).await;
    assert!(text.is_empty());

    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_listener_serves_over_tcp() {
    let root = doc_root();
    let tcp = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = tcp.local_addr().unwrap();

    let cfg = Config {
        listen_addr: addr.to_string(),
        doc_root: root.path().to_path_buf(),
        read_timeout: SHORT_TIMEOUT,
    };
    let server = tokio::spawn(async move { listener::serve(tcp, &cfg).await });

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /../etc/passwd HTTP/1.1\r\nHost: x\r\n\r\n")
        .await
        .unwrap();

    let mut out = Vec::new();
    stream.read_to_end(&mut out).await.unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("HTTP/1.1 404 Not Found\r\n"));

    server.abort();
}

#[test]
fn test_accept_retry_backs_off_briefly() {
    assert!(listener::ACCEPT_RETRY_DELAY > Duration::ZERO);
    assert!(listener::ACCEPT_RETRY_DELAY < SHORT_TIMEOUT);
}
