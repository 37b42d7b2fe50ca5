pub mod diagnosis;
pub mod providers;

pub use diagnosis::DiagnosisService;
