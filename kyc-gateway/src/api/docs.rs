//! OpenAPI document and Swagger UI page

use crate::openapi::ApiDoc;
use axum::{response::Html, Json};

pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

const SWAGGER_UI_CDN: &str = "https://cdn.jsdelivr.net/npm/swagger-ui-dist";

/// GET /api-docs/openapi.json
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::build())
}

/// GET /swagger-ui serves Swagger UI loaded from the jsDelivr CDN
pub async fn swagger_ui() -> Html<String> {
    Html(format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>KYC Verification Gateway API</title>
  <link rel="stylesheet" href="{cdn}/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="{cdn}/swagger-ui-bundle.js"></script>
  <script>
    window.onload = () => {{
      window.ui = SwaggerUIBundle({{ url: "{openapi_url}", dom_id: "#swagger-ui" }});
    }};
  </script>
</body>
</html>"##,
        cdn = SWAGGER_UI_CDN,
        openapi_url = OPENAPI_JSON_PATH,
    ))
}
