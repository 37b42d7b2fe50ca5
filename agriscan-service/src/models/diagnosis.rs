use axum::{
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use std::fmt;

/// What the gateway hands back for a successful model call.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnosis {
    /// The model's answer parsed as JSON, returned unchanged.
    Structured(Value),
    /// The model's answer was not JSON; passed through verbatim.
    Raw(String),
}

impl Diagnosis {
    /// Parses the model's text, keeping it as-is when it is not JSON.
    pub fn from_content(content: String) -> Self {
        match serde_json::from_str::<Value>(&content) {
            Ok(value) => Diagnosis::Structured(value),
            Err(_) => Diagnosis::Raw(content),
        }
    }

    pub fn kind(&self) -> DiagnosisKind {
        match self {
            Diagnosis::Structured(value) => DiagnosisKind::classify(value),
            Diagnosis::Raw(_) => DiagnosisKind::Unrecognized,
        }
    }
}

impl IntoResponse for Diagnosis {
    fn into_response(self) -> Response {
        match self {
            Diagnosis::Structured(value) => Json(value).into_response(),
            Diagnosis::Raw(text) => (
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                text,
            )
                .into_response(),
        }
    }
}

/// Which of the prompt's answer shapes a structured diagnosis matches.
///
/// Only used for logging; the returned value is never reshaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosisKind {
    Healthy,
    Diseased,
    InvalidImage,
    Unrecognized,
}

impl DiagnosisKind {
    pub fn classify(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return DiagnosisKind::Unrecognized;
        };

        match object.get("status").and_then(Value::as_str) {
            Some(status) if status.eq_ignore_ascii_case("healthy") => DiagnosisKind::Healthy,
            Some(status) if status.eq_ignore_ascii_case("diseased") => DiagnosisKind::Diseased,
            _ if object.contains_key("error") => DiagnosisKind::InvalidImage,
            _ => DiagnosisKind::Unrecognized,
        }
    }
}

impl fmt::Display for DiagnosisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosisKind::Healthy => "healthy",
            DiagnosisKind::Diseased => "diseased",
            DiagnosisKind::InvalidImage => "invalid_image",
            DiagnosisKind::Unrecognized => "unrecognized",
        };
        f.write_str(name)
    }
}
