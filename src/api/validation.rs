use actix_web::HttpResponse;
use serde::Serialize;

/// Standard error body for every failure response in the service.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub fields: serde_json::Value,
}

/// JSON extractor configuration with standardized error handling, shared by
/// every endpoint that accepts a body.
pub fn json_config() -> actix_web_validator::JsonConfig {
    actix_web_validator::JsonConfig::default().error_handler(|err, _req| {
        let mut fields = serde_json::Map::new();

        match err {
            actix_web_validator::Error::Validate(validation_errors) => {
                for (field, errors) in validation_errors.field_errors() {
                    let messages: Vec<String> = errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| format!("Invalid value for field: {}", field))
                        })
                        .collect();
                    fields.insert(field.to_string(), serde_json::json!({"errors": messages}));
                }

                bad_request("Validation failed", fields)
            }
            actix_web_validator::Error::Deserialize(de_err) => {
                let err_string = de_err.to_string();

                let message = if err_string.contains("EOF while parsing") {
                    "Request body is empty. Expected JSON payload"
                } else if err_string.contains("unknown variant") {
                    "Invalid enum value. Check allowed values for this field"
                } else {
                    "Invalid JSON format"
                };
                fields.insert("message".to_string(), serde_json::json!(message));

                bad_request("Request validation failed", fields)
            }
            _ => {
                fields.insert("message".to_string(), serde_json::json!("Validation error"));
                bad_request("Validation failed", fields)
            }
        }
    })
}

fn bad_request(error: &str, fields: serde_json::Map<String, serde_json::Value>) -> actix_web::Error {
    let body = ErrorResponse {
        error: error.to_string(),
        fields: serde_json::Value::Object(fields),
    };
    actix_web::error::InternalError::from_response("", HttpResponse::BadRequest().json(body)).into()
}

/// Query-string extractor configuration: malformed parameters (for example an
/// unknown status literal) answer with the same error body shape.
pub fn query_config() -> actix_web::web::QueryConfig {
    actix_web::web::QueryConfig::default().error_handler(|err, _req| {
        let body = ErrorResponse {
            error: "Invalid query parameters".to_string(),
            fields: serde_json::json!({"message": err.to_string()}),
        };
        actix_web::error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(body),
        )
        .into()
    })
}
