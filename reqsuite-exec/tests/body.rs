use std::io::Write;

use reqsuite_core::{MultipartPart, RequestBody};
use reqsuite_exec::executor::{serialize_body, BodyError, FileReadKind};
use serde_json::json;

fn find(haystack: &[u8], needle: &str) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|w| w == needle.as_bytes())
}

#[tokio::test]
async fn json_body_is_canonical_json() {
    let body = RequestBody::Json {
        content: json!({ "name": "zoe", "age": 30 }),
    };

    let serialized = serialize_body(&body).await.unwrap();
    assert_eq!(serialized.content_type, "application/json");
    let round_trip: serde_json::Value = serde_json::from_slice(&serialized.bytes).unwrap();
    assert_eq!(round_trip, json!({ "name": "zoe", "age": 30 }));
}

#[tokio::test]
async fn graphql_body_includes_variables_when_present() {
    let body = RequestBody::Graphql {
        query: "query($id: ID!) { user(id: $id) { name } }".to_string(),
        variables: Some(json!({ "id": "7" })),
    };

    let serialized = serialize_body(&body).await.unwrap();
    assert_eq!(serialized.content_type, "application/json");
    let payload: serde_json::Value = serde_json::from_slice(&serialized.bytes).unwrap();
    assert_eq!(payload["variables"], json!({ "id": "7" }));
    assert!(payload["query"].as_str().unwrap().starts_with("query("));
}

#[tokio::test]
async fn graphql_body_omits_absent_variables() {
    let body = RequestBody::Graphql {
        query: "{ users { name } }".to_string(),
        variables: None,
    };

    let serialized = serialize_body(&body).await.unwrap();
    let payload: serde_json::Value = serde_json::from_slice(&serialized.bytes).unwrap();
    assert!(payload.get("variables").is_none());
}

#[tokio::test]
async fn passthrough_variants_keep_bytes_and_pick_content_type() {
    let cases = [
        (
            RequestBody::Xml {
                content: "<user/>".to_string(),
            },
            "application/xml",
            "<user/>",
        ),
        (
            RequestBody::Text {
                content: "plain".to_string(),
            },
            "text/plain",
            "plain",
        ),
        (
            RequestBody::FormUrlencoded {
                content: "a=1&b=2".to_string(),
            },
            "application/x-www-form-urlencoded",
            "a=1&b=2",
        ),
    ];

    for (body, content_type, expected) in cases {
        let serialized = serialize_body(&body).await.unwrap();
        assert_eq!(serialized.content_type, content_type);
        assert_eq!(serialized.bytes, expected.as_bytes());
    }
}

#[tokio::test]
async fn multipart_preserves_part_order() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"file-content").unwrap();
    let path = file.path().to_string_lossy().into_owned();

    let body = RequestBody::Multipart {
        parts: vec![
            MultipartPart::Field {
                name: "a".to_string(),
                value: "1".to_string(),
            },
            MultipartPart::File {
                name: "b".to_string(),
                path,
                mime_type: None,
            },
        ],
    };

    let serialized = serialize_body(&body).await.unwrap();
    assert!(serialized
        .content_type
        .starts_with("multipart/form-data; boundary="));

    let pos_a = find(&serialized.bytes, "name=\"a\"").expect("part a missing");
    let pos_b = find(&serialized.bytes, "name=\"b\"").expect("part b missing");
    assert!(pos_a < pos_b, "part order not preserved");
    assert!(find(&serialized.bytes, "file-content").is_some());
}

#[tokio::test]
async fn multipart_declared_mime_type_wins_over_inference() {
    let file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    let path = file.path().to_string_lossy().into_owned();

    let body = RequestBody::Multipart {
        parts: vec![MultipartPart::File {
            name: "payload".to_string(),
            path,
            mime_type: Some("application/x-custom".to_string()),
        }],
    };

    let serialized = serialize_body(&body).await.unwrap();
    assert!(find(&serialized.bytes, "Content-Type: application/x-custom").is_some());
    assert!(find(&serialized.bytes, "Content-Type: application/json").is_none());
}

#[tokio::test]
async fn multipart_infers_mime_type_from_extension() {
    let file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    let path = file.path().to_string_lossy().into_owned();

    let body = RequestBody::Multipart {
        parts: vec![MultipartPart::File {
            name: "payload".to_string(),
            path,
            mime_type: None,
        }],
    };

    let serialized = serialize_body(&body).await.unwrap();
    assert!(find(&serialized.bytes, "Content-Type: application/json").is_some());
}

#[tokio::test]
async fn multipart_escapes_quotes_and_newlines_in_disposition_values() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let path = file.path().to_string_lossy().into_owned();

    let body = RequestBody::Multipart {
        parts: vec![
            MultipartPart::Field {
                name: "a\"; filename=\"evil".to_string(),
                value: "1".to_string(),
            },
            MultipartPart::File {
                name: "line\r\nbreak".to_string(),
                path,
                mime_type: None,
            },
        ],
    };

    let serialized = serialize_body(&body).await.unwrap();

    // A quote in a field name must not close the parameter and smuggle in a
    // second one.
    assert!(find(&serialized.bytes, "name=\"a%22; filename=%22evil\"").is_some());
    assert!(find(&serialized.bytes, "name=\"a\"; filename=\"evil\"").is_none());
    assert!(find(&serialized.bytes, "name=\"line%0D%0Abreak\"").is_some());
}

#[tokio::test]
async fn missing_file_part_reports_not_found() {
    let body = RequestBody::Multipart {
        parts: vec![MultipartPart::File {
            name: "payload".to_string(),
            path: "/definitely/not/here.bin".to_string(),
            mime_type: None,
        }],
    };

    match serialize_body(&body).await.unwrap_err() {
        BodyError::FileRead { path, kind, .. } => {
            assert_eq!(path, "/definitely/not/here.bin");
            assert_eq!(kind, FileReadKind::NotFound);
        }
        other => panic!("expected FileRead, got {other:?}"),
    }
}
