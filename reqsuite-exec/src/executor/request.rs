use reqsuite_core::{
    resolve_string, resolve_value, Environment, MultipartPart, RequestBody, RequestDefinition,
    TemplateError,
};

use crate::executor::body::{serialize_body, BodyError};
use crate::executor::http::HttpRequestParts;

/// Errors raised while turning a definition into wire-ready parts. All of
/// them are scoped to the one request and fail it before any network I/O.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("invalid URL {url:?}: {message}")]
    InvalidUrl { url: String, message: String },
    #[error(transparent)]
    Body(#[from] BodyError),
}

/// Builds the wire-ready request parts for a definition: placeholders are
/// resolved against the environment, query pairs are appended to the URL, and
/// the body is serialized. The serializer's content type is applied unless the
/// definition sets an explicit `Content-Type` header.
pub async fn build_request(
    def: &RequestDefinition,
    env: &Environment,
) -> Result<HttpRequestParts, BuildError> {
    let url_str = resolve_string(&def.url, env)?;
    let mut url = url::Url::parse(&url_str).map_err(|e| BuildError::InvalidUrl {
        url: url_str.clone(),
        message: e.to_string(),
    })?;

    if !def.query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in &def.query {
            pairs.append_pair(key, &resolve_string(value, env)?);
        }
    }

    let mut headers = Vec::with_capacity(def.headers.len() + 1);
    for (key, value) in &def.headers {
        headers.push((key.clone(), resolve_string(value, env)?));
    }

    let mut body = Vec::new();
    if let Some(body_def) = &def.body {
        let resolved = resolve_body(body_def, env)?;
        let serialized = serialize_body(&resolved).await?;
        let has_content_type = headers
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case("content-type"));
        if !has_content_type {
            headers.push(("Content-Type".to_string(), serialized.content_type));
        }
        body = serialized.bytes;
    }

    Ok(HttpRequestParts {
        method: def.method.clone(),
        url: url.to_string(),
        headers,
        body,
    })
}

/// Resolves placeholders in every templatable field of a body variant,
/// including multipart file paths and MIME types.
fn resolve_body(body: &RequestBody, env: &Environment) -> Result<RequestBody, TemplateError> {
    Ok(match body {
        RequestBody::Json { content } => RequestBody::Json {
            content: resolve_value(content, env)?,
        },
        RequestBody::Graphql { query, variables } => RequestBody::Graphql {
            query: resolve_string(query, env)?,
            variables: variables
                .as_ref()
                .map(|v| resolve_value(v, env))
                .transpose()?,
        },
        RequestBody::Xml { content } => RequestBody::Xml {
            content: resolve_string(content, env)?,
        },
        RequestBody::Text { content } => RequestBody::Text {
            content: resolve_string(content, env)?,
        },
        RequestBody::FormUrlencoded { content } => RequestBody::FormUrlencoded {
            content: resolve_string(content, env)?,
        },
        RequestBody::Multipart { parts } => {
            let mut resolved = Vec::with_capacity(parts.len());
            for part in parts {
                resolved.push(match part {
                    MultipartPart::Field { name, value } => MultipartPart::Field {
                        name: name.clone(),
                        value: resolve_string(value, env)?,
                    },
                    MultipartPart::File {
                        name,
                        path,
                        mime_type,
                    } => MultipartPart::File {
                        name: name.clone(),
                        path: resolve_string(path, env)?,
                        mime_type: mime_type
                            .as_ref()
                            .map(|m| resolve_string(m, env))
                            .transpose()?,
                    },
                });
            }
            RequestBody::Multipart { parts: resolved }
        }
    })
}
