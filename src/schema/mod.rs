//! Schema-driven forms - field extraction, validation and prompting

pub mod fields;
pub mod form;
pub mod validator;
pub mod wizard;

pub use fields::{extract_fields, FieldKind, FieldSpec};
pub use form::FormSession;
pub use validator::{FormValidationError, FormValidator, ValidationReport, Violation};
pub use wizard::FormWizard;
