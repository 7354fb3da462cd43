//! Mock Cloudinary API server for testing
//!
//! Simulates the two endpoints the asset host uses:
//! - POST /v1_1/{cloud}/image/upload (multipart) returns { secure_url, public_id }
//! - POST /v1_1/{cloud}/image/destroy (form) returns { result: "ok" | "not found" }
//!
//! Signatures are checked against the configured secret, so a client that
//! signs the wrong parameters gets a 401 like it would in production.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use super::cloudinary::sign;

/// Mock Cloudinary server for testing
pub struct MockCloudinaryServer {
    port: u16,
    running: Arc<AtomicBool>,
    state: Arc<MockState>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

/// Configuration for the mock server
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Reject every request with 401
    pub fail_auth: bool,
    /// Answer destroy calls with HTTP 500
    pub fail_destroy: bool,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            cloud_name: "demo".to_string(),
            api_key: "mock_key".to_string(),
            api_secret: "mock_secret".to_string(),
            fail_auth: false,
            fail_destroy: false,
        }
    }
}

#[derive(Default)]
struct MockState {
    uploads: AtomicUsize,
    /// Public ids that are currently stored
    stored: Mutex<Vec<String>>,
    /// Public ids passed to destroy, in call order
    destroyed: Mutex<Vec<String>>,
}

impl MockCloudinaryServer {
    /// Start a new mock server on a random available port
    pub fn start(config: MockConfig) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();
        let state = Arc::new(MockState::default());
        let state_clone = state.clone();

        // Non-blocking accept loop for graceful shutdown
        listener.set_nonblocking(true)?;

        let thread_handle = thread::spawn(move || {
            while running_clone.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        let cfg = config.clone();
                        let state = state_clone.clone();
                        thread::spawn(move || handle_connection(stream, &cfg, &state));
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(std::time::Duration::from_millis(10));
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(Self {
            port,
            running,
            state,
            thread_handle: Some(thread_handle),
        })
    }

    /// Get the base URL for this mock server
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Number of successful uploads
    pub fn upload_count(&self) -> usize {
        self.state.uploads.load(Ordering::SeqCst)
    }

    /// Public ids passed to destroy
    pub fn destroyed(&self) -> Vec<String> {
        self.state.destroyed.lock().unwrap().clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MockCloudinaryServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Read the request head and the full body (per Content-Length)
fn read_request(stream: &mut TcpStream) -> Option<(String, Vec<u8>)> {
    let mut data = Vec::new();
    let mut buffer = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut buffer).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buffer[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&data[..header_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while data.len() < header_end + content_length {
        let n = stream.read(&mut buffer).ok()?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buffer[..n]);
    }

    Some((head, data[header_end..].to_vec()))
}

/// Extract a text field from a multipart/form-data body
fn multipart_field(body: &str, name: &str) -> Option<String> {
    let marker = format!("name=\"{}\"", name);
    let start = body.find(&marker)?;
    let rest = &body[start..];
    let value_start = rest.find("\r\n\r\n")? + 4;
    let value = &rest[value_start..];
    let value_end = value.find("\r\n")?;
    Some(value[..value_end].to_string())
}

fn multipart_file_name(body: &str) -> Option<String> {
    let marker = "filename=\"";
    let start = body.find(marker)? + marker.len();
    let end = body[start..].find('"')?;
    Some(body[start..start + end].to_string())
}

fn form_field(body: &str, name: &str) -> Option<String> {
    url::form_urlencoded::parse(body.as_bytes())
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

fn handle_connection(mut stream: TcpStream, config: &MockConfig, state: &MockState) {
    let _ = stream.set_nonblocking(false);
    let Some((head, body)) = read_request(&mut stream) else {
        return;
    };
    let body = String::from_utf8_lossy(&body).to_string();

    let first_line = head.lines().next().unwrap_or("");
    let parts: Vec<&str> = first_line.split_whitespace().collect();
    if parts.len() < 2 {
        send_error(&mut stream, 400, "Bad Request", "Invalid request");
        return;
    }

    let (method, path) = (parts[0], parts[1]);
    let prefix = format!("/v1_1/{}/image/", config.cloud_name);

    if config.fail_auth {
        send_error(&mut stream, 401, "Unauthorized", "Invalid API key");
        return;
    }

    if method != "POST" {
        send_error(&mut stream, 405, "Method Not Allowed", "Method not allowed");
        return;
    }

    match path.strip_prefix(&prefix) {
        Some("upload") => {
            let field = |name: &str| multipart_field(&body, name).unwrap_or_default();
            let signed = [
                ("folder", field("folder")),
                ("timestamp", field("timestamp")),
                ("unique_filename", field("unique_filename")),
                ("use_filename", field("use_filename")),
            ];
            if field("api_key") != config.api_key
                || field("signature") != sign(&signed, &config.api_secret)
            {
                send_error(&mut stream, 401, "Unauthorized", "Invalid Signature");
                return;
            }

            let n = state.uploads.fetch_add(1, Ordering::SeqCst) + 1;
            let stem = multipart_file_name(&body)
                .and_then(|f| f.split('.').next().map(String::from))
                .unwrap_or_else(|| "file".to_string());
            let public_id = format!("{}/{}_{}", field("folder"), stem, n);
            state.stored.lock().unwrap().push(public_id.clone());

            let json = serde_json::json!({
                "public_id": public_id,
                "secure_url": format!(
                    "https://res.cloudinary.com/{}/image/upload/{}.png",
                    config.cloud_name, public_id
                ),
            });
            send_response(&mut stream, 200, "OK", &json.to_string());
        }
        Some("destroy") => {
            let field = |name: &str| form_field(&body, name).unwrap_or_default();
            let public_id = field("public_id");
            let signed = [
                ("public_id", public_id.clone()),
                ("timestamp", field("timestamp")),
            ];
            if field("api_key") != config.api_key
                || field("signature") != sign(&signed, &config.api_secret)
            {
                send_error(&mut stream, 401, "Unauthorized", "Invalid Signature");
                return;
            }

            state.destroyed.lock().unwrap().push(public_id.clone());

            if config.fail_destroy {
                send_error(&mut stream, 500, "Internal Server Error", "Destroy failed");
                return;
            }

            let mut stored = state.stored.lock().unwrap();
            let result = match stored.iter().position(|p| *p == public_id) {
                Some(i) => {
                    stored.remove(i);
                    "ok"
                }
                None => "not found",
            };
            let json = serde_json::json!({ "result": result });
            send_response(&mut stream, 200, "OK", &json.to_string());
        }
        _ => send_error(&mut stream, 404, "Not Found", "Endpoint not found"),
    }
}

fn send_error(stream: &mut TcpStream, status: u16, status_text: &str, message: &str) {
    let json = serde_json::json!({ "error": { "message": message } });
    send_response(stream, status, status_text, &json.to_string());
}

fn send_response(stream: &mut TcpStream, status: u16, status_text: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        status_text,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cloudinary::CloudinaryAssetHost;
    use crate::config::CloudinaryConfig;
    use crate::domain::result::Error;
    use crate::domain::ImageUpload;
    use crate::ports::AssetHost;

    fn host_for(server: &MockCloudinaryServer, secret: &str) -> CloudinaryAssetHost {
        CloudinaryAssetHost::new(&CloudinaryConfig {
            cloud_name: "demo".to_string(),
            api_key: "mock_key".to_string(),
            api_secret: secret.to_string(),
            folder: "mood".to_string(),
            base_url: Some(server.base_url()),
        })
        .unwrap()
    }

    fn png() -> ImageUpload {
        ImageUpload::new("avatar.png", vec![0x89, b'P', b'N', b'G', 1, 2, 3])
    }

    #[test]
    fn test_upload_returns_secure_url_and_public_id() {
        let server = MockCloudinaryServer::start(MockConfig::default()).unwrap();
        let host = host_for(&server, "mock_secret");

        let image = host.upload(&png()).unwrap();

        assert_eq!(image.public_id, "mood/avatar_1");
        assert!(image.url.starts_with("https://res.cloudinary.com/demo/"));
        assert_eq!(server.upload_count(), 1);
    }

    #[test]
    fn test_destroy_uploaded_image() {
        let server = MockCloudinaryServer::start(MockConfig::default()).unwrap();
        let host = host_for(&server, "mock_secret");

        let image = host.upload(&png()).unwrap();
        host.delete(&image.public_id).unwrap();

        assert_eq!(server.destroyed(), vec![image.public_id]);
    }

    #[test]
    fn test_destroy_unknown_id_fails() {
        let server = MockCloudinaryServer::start(MockConfig::default()).unwrap();
        let host = host_for(&server, "mock_secret");

        let err = host.delete("mood/never_uploaded").unwrap_err();
        assert!(matches!(err, Error::AssetHost(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let server = MockCloudinaryServer::start(MockConfig::default()).unwrap();
        let host = host_for(&server, "not_the_secret");

        let err = host.upload(&png()).unwrap_err();
        assert!(err.to_string().contains("authentication"));
        assert_eq!(server.upload_count(), 0);
    }

    #[test]
    fn test_server_error_on_destroy() {
        let server = MockCloudinaryServer::start(MockConfig {
            fail_destroy: true,
            ..Default::default()
        })
        .unwrap();
        let host = host_for(&server, "mock_secret");

        let err = host.delete("mood/anything").unwrap_err();
        assert!(err.to_string().contains("HTTP 500"));
    }

    #[test]
    fn test_unreachable_host() {
        // Bind then drop to get a port nobody listens on
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let host = CloudinaryAssetHost::new(&CloudinaryConfig {
            cloud_name: "demo".to_string(),
            api_key: "k".to_string(),
            api_secret: "s".to_string(),
            folder: "mood".to_string(),
            base_url: Some(format!("http://127.0.0.1:{}", port)),
        })
        .unwrap();

        assert!(host.upload(&png()).is_err());
    }
}
