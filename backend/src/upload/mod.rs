pub mod form;
pub mod validator;

pub use form::{FilePart, UploadForm};
pub use validator::{UploadRules, ValidationError};
