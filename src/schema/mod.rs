//! Schema system - schema construction, validation and template generation

pub mod builder;
pub mod cinematic;
pub mod lint;
pub mod registry;
pub mod template;
pub mod validator;
pub mod wizard;

pub use cinematic::cinematic_schema;
pub use lint::lint;
pub use registry::SchemaRegistry;
pub use template::{TemplateContext, TemplateGenerator};
pub use validator::{ValidationError, ValidationIssue, Validator};
pub use wizard::{SchemaWizard, WizardResult};
