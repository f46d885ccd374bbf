mod common;

use common::{
    cat_bytes, mount_compress, mount_output_failure, AUTH_HEADER, OUTPUT_PATH, S3_LOCATION,
};
use serde_json::json;
use tinypng::{S3Configuration, TinyPngError};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ACCESS_KEY_ID: &str = "lolwat";
const SECRET_ACCESS_KEY: &str = "lolwat-secret";

fn s3_settings() -> S3Configuration {
    S3Configuration::new(
        ACCESS_KEY_ID,
        SECRET_ACCESS_KEY,
        "tinypng-test-bucket",
        "ap-southeast-2",
    )
}

async fn mount_store(server: &MockServer, expected_store: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path(OUTPUT_PATH))
        .and(header("authorization", AUTH_HEADER))
        .and(body_json(json!({ "store": expected_store })))
        .respond_with(ResponseTemplate::new(200).insert_header("Location", S3_LOCATION))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_store_to_s3_with_explicit_settings() {
    let server = MockServer::start().await;
    mount_compress(&server).await;
    mount_store(
        &server,
        json!({
            "service": "s3",
            "aws_access_key_id": ACCESS_KEY_ID,
            "aws_secret_access_key": SECRET_ACCESS_KEY,
            "region": "ap-southeast-2",
            "path": "tinypng-test-bucket/path.jpg"
        }),
    )
    .await;

    let client = common::client(&server);
    let result = client.compress(cat_bytes()).await.unwrap();
    let settings = s3_settings();
    let location = client
        .store_to_s3(&result, &settings, "path.jpg")
        .await
        .unwrap();

    assert_eq!(location.as_str(), S3_LOCATION);
    assert_eq!(settings.path, "");
}

#[tokio::test]
async fn test_store_with_client_defaults() {
    let server = MockServer::start().await;
    mount_compress(&server).await;
    mount_store(
        &server,
        json!({
            "service": "s3",
            "aws_access_key_id": ACCESS_KEY_ID,
            "aws_secret_access_key": SECRET_ACCESS_KEY,
            "region": "ap-southeast-2",
            "path": "tinypng-test-bucket/path.jpg"
        }),
    )
    .await;

    let client = common::client(&server).with_s3_configuration(s3_settings());
    let result = client.compress(cat_bytes()).await.unwrap();
    let location = client.store(&result, "path.jpg", None, None).await.unwrap();

    assert_eq!(location.as_str(), S3_LOCATION);
}

#[tokio::test]
async fn test_store_overrides_do_not_touch_defaults() {
    let server = MockServer::start().await;
    mount_compress(&server).await;
    mount_store(
        &server,
        json!({
            "service": "s3",
            "aws_access_key_id": ACCESS_KEY_ID,
            "aws_secret_access_key": SECRET_ACCESS_KEY,
            "region": "us-west-1",
            "path": "other-bucket/images/cat.jpg"
        }),
    )
    .await;

    let client = common::client(&server).with_s3_configuration(s3_settings());
    let result = client.compress(cat_bytes()).await.unwrap();
    client
        .store(&result, "images/cat.jpg", Some("other-bucket"), Some("us-west-1"))
        .await
        .unwrap();

    let defaults = client.s3_configuration().unwrap();
    assert_eq!(defaults.bucket, "tinypng-test-bucket");
    assert_eq!(defaults.region, "ap-southeast-2");
    assert_eq!(defaults.path, "");
}

#[tokio::test]
async fn test_store_without_defaults_is_invalid_operation() {
    let server = MockServer::start().await;
    mount_compress(&server).await;
    Mock::given(method("POST"))
        .and(path(OUTPUT_PATH))
        .respond_with(ResponseTemplate::new(200).insert_header("Location", S3_LOCATION))
        .expect(0)
        .mount(&server)
        .await;

    let client = common::client(&server);
    let result = client.compress(cat_bytes()).await.unwrap();

    let err = client.store(&result, "", None, None).await.unwrap_err();
    assert!(matches!(err, TinyPngError::InvalidOperation(_)));

    let err = client
        .store(&result, "bucket/path.jpg", None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, TinyPngError::InvalidOperation(_)));

    let err = client
        .store_to_s3(&result, &s3_settings(), "")
        .await
        .unwrap_err();
    assert!(matches!(err, TinyPngError::InvalidArgument { name: "path", .. }));
}

#[tokio::test]
async fn test_store_failure_is_api_error() {
    let server = MockServer::start().await;
    mount_compress(&server).await;
    mount_output_failure(&server, "POST", 400).await;

    let client = common::client(&server);
    let result = client.compress(cat_bytes()).await.unwrap();
    let err = client
        .store_to_s3(&result, &s3_settings(), "path")
        .await
        .unwrap_err();

    let api_error = err.as_api_error().unwrap();
    assert_eq!(api_error.status_code, 400);
    assert_eq!(api_error.message, "This is the error message");
}

#[tokio::test]
async fn test_store_without_location_header() {
    let server = MockServer::start().await;
    mount_compress(&server).await;
    Mock::given(method("POST"))
        .and(path(OUTPUT_PATH))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = common::client(&server);
    let result = client.compress(cat_bytes()).await.unwrap();
    let err = client
        .store_to_s3(&result, &s3_settings(), "path.jpg")
        .await
        .unwrap_err();

    assert!(matches!(err, TinyPngError::MissingHeader("Location")));
}
