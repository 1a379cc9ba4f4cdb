use std::fmt;
use std::path::Path;

use reqsuite_core::{MultipartPart, RequestBody};
use uuid::Uuid;

/// Wire bytes plus the content type the serializer chose for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedBody {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileReadKind {
    NotFound,
    PermissionDenied,
    Io,
}

impl fmt::Display for FileReadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileReadKind::NotFound => write!(f, "not found"),
            FileReadKind::PermissionDenied => write!(f, "permission denied"),
            FileReadKind::Io => write!(f, "i/o error"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BodyError {
    #[error("failed to encode body as JSON: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("failed to read multipart file {path:?} ({kind}): {message}")]
    FileRead {
        path: String,
        kind: FileReadKind,
        message: String,
    },
}

/// Converts an already-resolved body variant into transmittable bytes and a
/// content-type header value. Multipart file parts are read here; all other
/// variants are pure.
pub async fn serialize_body(body: &RequestBody) -> Result<SerializedBody, BodyError> {
    match body {
        RequestBody::Json { content } => Ok(SerializedBody {
            bytes: serde_json::to_vec(content)?,
            content_type: "application/json".to_string(),
        }),
        RequestBody::Graphql { query, variables } => {
            let mut payload = serde_json::json!({ "query": query });
            if let Some(vars) = variables {
                payload["variables"] = vars.clone();
            }
            Ok(SerializedBody {
                bytes: serde_json::to_vec(&payload)?,
                content_type: "application/json".to_string(),
            })
        }
        RequestBody::Xml { content } => Ok(SerializedBody {
            bytes: content.as_bytes().to_vec(),
            content_type: "application/xml".to_string(),
        }),
        RequestBody::Text { content } => Ok(SerializedBody {
            bytes: content.as_bytes().to_vec(),
            content_type: "text/plain".to_string(),
        }),
        RequestBody::FormUrlencoded { content } => Ok(SerializedBody {
            bytes: content.as_bytes().to_vec(),
            content_type: "application/x-www-form-urlencoded".to_string(),
        }),
        RequestBody::Multipart { parts } => serialize_multipart(parts).await,
    }
}

async fn serialize_multipart(parts: &[MultipartPart]) -> Result<SerializedBody, BodyError> {
    let boundary = format!("reqsuite-{}", Uuid::new_v4().simple());
    let mut bytes = Vec::new();

    for part in parts {
        bytes.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        match part {
            MultipartPart::Field { name, value } => {
                let name = escape_disposition_value(name);
                bytes.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                bytes.extend_from_slice(value.as_bytes());
                bytes.extend_from_slice(b"\r\n");
            }
            MultipartPart::File {
                name,
                path,
                mime_type,
            } => {
                let file_path = Path::new(path);
                let content = tokio::fs::read(file_path).await.map_err(|e| {
                    BodyError::FileRead {
                        path: path.clone(),
                        kind: match e.kind() {
                            std::io::ErrorKind::NotFound => FileReadKind::NotFound,
                            std::io::ErrorKind::PermissionDenied => FileReadKind::PermissionDenied,
                            _ => FileReadKind::Io,
                        },
                        message: e.to_string(),
                    }
                })?;

                let filename = escape_disposition_value(
                    &file_path.file_name().unwrap_or_default().to_string_lossy(),
                );
                let name = escape_disposition_value(name);
                let mime = mime_type
                    .clone()
                    .unwrap_or_else(|| infer_mime_type(file_path).to_string());

                bytes.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n"
                    )
                    .as_bytes(),
                );
                bytes.extend_from_slice(format!("Content-Type: {mime}\r\n\r\n").as_bytes());
                bytes.extend_from_slice(&content);
                bytes.extend_from_slice(b"\r\n");
            }
        }
    }

    bytes.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    Ok(SerializedBody {
        bytes,
        content_type: format!("multipart/form-data; boundary={boundary}"),
    })
}

/// Percent-encodes the bytes that would end or corrupt a quoted
/// `Content-Disposition` parameter (RFC 7578 §2). Names and filenames may
/// carry placeholder-substituted text, so they cannot be trusted verbatim.
fn escape_disposition_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => escaped.push_str("%22"),
            '\r' => escaped.push_str("%0D"),
            '\n' => escaped.push_str("%0A"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn infer_mime_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("json") => "application/json",
        Some("xml") => "application/xml",
        Some("txt") => "text/plain",
        Some("html") | Some("htm") => "text/html",
        Some("csv") => "text/csv",
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}
