#![allow(dead_code)]

use std::path::{Path, PathBuf};

use serde_json::json;
use tinypng::TinyPngClient;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_KEY: &str = "lolwat";
/// `Basic base64("api:lolwat")`
pub const AUTH_HEADER: &str = "Basic YXBpOmxvbHdhdA==";

pub const ORIGINAL_SIZE: usize = 18031;
pub const COMPRESSED_SIZE: usize = 16646;
pub const RESIZED_SIZE: usize = 5970;

pub const OUTPUT_PATH: &str = "/output/2xnsp7jn34e5";
pub const S3_LOCATION: &str =
    "https://s3-ap-southeast-2.amazonaws.com/tinypng-test-bucket/path.jpg";

pub fn client(server: &MockServer) -> TinyPngClient {
    TinyPngClient::new_with_url(API_KEY, &server.uri()).unwrap()
}

pub fn output_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), OUTPUT_PATH)
}

/// Bytes standing in for the 400x400 cat fixture.
pub fn cat_bytes() -> Vec<u8> {
    let mut data = vec![0u8; ORIGINAL_SIZE];
    data[..3].copy_from_slice(&[0xFF, 0xD8, 0xFF]);
    data
}

pub fn write_cat(dir: &Path) -> PathBuf {
    let file_path = dir.join("cat.jpg");
    std::fs::write(&file_path, cat_bytes()).unwrap();
    file_path
}

pub fn shrink_body(server: &MockServer) -> serde_json::Value {
    json!({
        "input": { "size": ORIGINAL_SIZE, "type": "image/jpeg" },
        "output": {
            "size": COMPRESSED_SIZE,
            "type": "image/jpeg",
            "width": 400,
            "height": 400,
            "ratio": 0.9232,
            "url": output_url(server)
        }
    })
}

/// `POST /shrink` answering like the real API, including `Compression-Count: 99`.
pub async fn mount_compress(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/shrink"))
        .and(header("authorization", AUTH_HEADER))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("Compression-Count", "99")
                .insert_header("Location", output_url(server).as_str())
                .set_body_json(shrink_body(server)),
        )
        .mount(server)
        .await;
}

/// `POST /shrink` that must never be reached.
pub async fn mount_compress_never_called(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/shrink"))
        .respond_with(ResponseTemplate::new(201).set_body_json(shrink_body(server)))
        .expect(0)
        .mount(server)
        .await;
}

pub async fn mount_download(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(OUTPUT_PATH))
        .and(header("authorization", AUTH_HEADER))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "image/jpeg")
                .set_body_bytes(vec![7u8; COMPRESSED_SIZE]),
        )
        .mount(server)
        .await;
}

pub async fn mount_resize(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(OUTPUT_PATH))
        .and(header("authorization", AUTH_HEADER))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Image-Width", "150")
                .insert_header("Image-Height", "150")
                .insert_header("Content-Type", "image/jpeg")
                .set_body_bytes(vec![1u8; RESIZED_SIZE]),
        )
        .mount(server)
        .await;
}

/// Any request to the output URL answered with the given status and error envelope.
pub async fn mount_output_failure(server: &MockServer, http_method: &str, status: u16) {
    Mock::given(method(http_method))
        .and(path(OUTPUT_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({
            "error": "Stuff's on fire yo!",
            "message": "This is the error message"
        })))
        .mount(server)
        .await;
}
