//! Outbound collaborators used by the HTTP handlers

pub mod license_interpreter;
pub mod originality;

pub use license_interpreter::{parse_license, GroqInterpreter, InterpreterError, LicenseInterpreter};
pub use originality::{MockOriginalityVerifier, OriginalityError, OriginalityVerifier, MOCK_NOTE};
