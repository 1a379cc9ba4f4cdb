/// A typed request body. Exactly one variant is active; the `type`
/// discriminant makes the variants mutually exclusive by construction.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequestBody {
    Json {
        content: serde_json::Value,
    },
    Graphql {
        query: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        variables: Option<serde_json::Value>,
    },
    Xml {
        content: String,
    },
    Text {
        content: String,
    },
    FormUrlencoded {
        content: String,
    },
    Multipart {
        /// Ordered; part order is preserved on the wire.
        parts: Vec<MultipartPart>,
    },
}

/// One part of a multipart body. The `path` of a file part may itself be
/// templated and is resolved before the file is read.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MultipartPart {
    Field {
        name: String,
        value: String,
    },
    File {
        name: String,
        path: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
    },
}
