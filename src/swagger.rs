use rocket_okapi::swagger_ui::SwaggerUIConfig;

/// Swagger UI served at /swagger, reading the generated document from the
/// mounted API.
pub fn swagger_ui() -> SwaggerUIConfig {
    SwaggerUIConfig {
        url: "/api/openapi.json".to_string(),
        deep_linking: true,
        ..Default::default()
    }
}
