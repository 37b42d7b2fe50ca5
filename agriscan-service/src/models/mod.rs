//! Request-scoped values of the diagnosis flow.

pub mod diagnosis;
pub mod upload;

pub use diagnosis::{Diagnosis, DiagnosisKind};
pub use upload::ImageUpload;
