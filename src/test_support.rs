//! Stub servers shared by the network tests.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Build a complete HTTP/1.1 response with the given extra header lines.
pub fn http_response(status: &str, headers: &[(&str, &str)], body: &str) -> String {
    let mut response = format!("HTTP/1.1 {status}\r\n");
    for (name, value) in headers {
        response.push_str(&format!("{name}: {value}\r\n"));
    }
    response.push_str(&format!(
        "Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    ));
    response
}

/// Serve `response` to every connection after reading its request head.
///
/// Returns the ephemeral port on 127.0.0.1.
pub async fn spawn_http_stub(response: String) -> u16 {
    spawn_stub(response.into_bytes(), true).await
}

/// Write `payload` to every connection without reading anything first.
pub async fn spawn_raw_stub(payload: &[u8]) -> u16 {
    spawn_stub(payload.to_vec(), false).await
}

/// Serve TLS with a fresh self-signed certificate for `localhost`.
///
/// With `Some(response)` the stub answers each request head with it. With
/// `None` it completes the handshake, then stays silent until the client
/// hangs up.
pub async fn spawn_tls_stub(response: Option<String>) -> u16 {
    let rcgen::CertifiedKey { cert, key_pair } =
        rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
    let identity = native_tls::Identity::from_pkcs8(
        cert.pem().as_bytes(),
        key_pair.serialize_pem().as_bytes(),
    )
    .unwrap();
    let acceptor =
        tokio_native_tls::TlsAcceptor::from(native_tls::TlsAcceptor::new(identity).unwrap());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        while let Ok((sock, _)) = listener.accept().await {
            let acceptor = acceptor.clone();
            let response = response.clone();
            tokio::spawn(async move {
                let Ok(mut tls) = acceptor.accept(sock).await else {
                    return;
                };
                if !read_request_head(&mut tls).await {
                    return;
                }
                match response {
                    Some(response) => {
                        let _ = tls.write_all(response.as_bytes()).await;
                        let _ = tls.shutdown().await;
                    }
                    None => {
                        let mut buf = [0u8; 1024];
                        while matches!(tls.read(&mut buf).await, Ok(n) if n > 0) {}
                    }
                }
            });
        }
    });
    port
}

async fn spawn_stub(payload: Vec<u8>, read_request: bool) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        while let Ok((mut sock, _)) = listener.accept().await {
            let payload = payload.clone();
            tokio::spawn(async move {
                if read_request && !read_request_head(&mut sock).await {
                    return;
                }
                let _ = sock.write_all(&payload).await;
                let _ = sock.shutdown().await;
            });
        }
    });
    port
}

/// Read until the blank line ending a request head. False if the peer left first.
async fn read_request_head<S: AsyncRead + Unpin>(stream: &mut S) -> bool {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return false,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }
    true
}
