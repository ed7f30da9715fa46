use axum::{extract::Path, Json};

use crate::templates::registry::{all_templates, get_template};
use crate::templates::structure::TemplateDescriptor;

/// GET /api/v1/templates
pub async fn handle_list_templates() -> Json<Vec<TemplateDescriptor>> {
    Json(all_templates().to_vec())
}

/// GET /api/v1/templates/:id
/// Unknown ids resolve to the `professional` template, same as the store does.
pub async fn handle_get_template(Path(id): Path<String>) -> Json<TemplateDescriptor> {
    Json(get_template(&id).clone())
}
