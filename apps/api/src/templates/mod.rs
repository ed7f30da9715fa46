// Template Registry: fixed catalog of letter templates and their structure rules.

pub mod handlers;
pub mod registry;
pub mod structure;

pub use registry::{all_templates, get_template};
pub use structure::{
    Alignment, ContactPlacement, ContentStructure, SpacingClass, TemplateDescriptor,
};
