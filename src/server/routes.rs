use crate::server::api;
use crate::server::pages;
use crate::server::AppState;

pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    fn json(payload: String) -> Self {
        HttpResponse {
            status_code: 200,
            status_text: "OK",
            content_type: "application/json",
            body: payload,
        }
    }

    pub(crate) fn html(status_code: u16, status_text: &'static str, body: String) -> Self {
        HttpResponse {
            status_code,
            status_text,
            content_type: "text/html; charset=utf-8",
            body,
        }
    }
}

/// Route one request. `path` may carry a query string.
pub fn route_request(state: &AppState, method: &str, path: &str, body: &str) -> HttpResponse {
    let (route, query) = path.split_once('?').unwrap_or((path, ""));

    match (method, route) {
        ("GET", "/") | ("GET", "/index.html") => pages::index_page(state, query),
        ("GET", "/api/health") => json_or_500(api::health_payload(state)),
        ("GET", "/api/data/version") => json_or_500(api::data_version_payload(state)),
        ("GET", "/api/facets") => json_or_500(api::facets_payload(state)),
        ("GET", "/api/monsters") => json_or_500(api::monsters_payload(state, query)),
        ("GET", route) if route.starts_with("/api/monsters/") => {
            let rest = route.trim_start_matches("/api/monsters/");
            let (segment, wants_export) = match rest.strip_suffix("/export") {
                Some(segment) => (segment, true),
                None => (rest, false),
            };
            let Ok(name) = urlencoding::decode(segment) else {
                return error_response(400, "Bad Request", "Monster name is not valid UTF-8");
            };
            let result = if wants_export {
                api::export_payload(state, &name)
            } else {
                api::stat_block_payload(state, &name)
            };
            match result {
                Ok(payload) => HttpResponse::json(payload),
                Err(api::MonsterPayloadError::NotFound(name)) => {
                    error_response(404, "Not Found", &format!("Monster not found: {name}"))
                }
                Err(err @ api::MonsterPayloadError::Render(_))
                | Err(err @ api::MonsterPayloadError::Export(_)) => {
                    error_response(422, "Unprocessable Entity", &err.to_string())
                }
                Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
            }
        }
        ("POST", "/api/encounter") => match api::encounter_payload(state, body) {
            Ok(payload) => HttpResponse::json(payload),
            Err(api::EncounterPayloadError::Parse(err)) => {
                error_response(400, "Bad Request", &format!("Invalid request body: {err}"))
            }
            Err(api::EncounterPayloadError::Validation(validation)) => {
                validation_error_response(400, "Bad Request", validation)
            }
        },
        _ => error_response(404, "Not Found", "Route not found"),
    }
}

fn json_or_500(payload: Result<String, serde_json::Error>) -> HttpResponse {
    match payload {
        Ok(payload) => HttpResponse::json(payload),
        Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
    }
}

fn validation_error_response(
    status_code: u16,
    status_text: &'static str,
    payload: api::ValidationErrorResponse,
) -> HttpResponse {
    let fallback =
        "{\n  \"status\": \"error\",\n  \"message\": \"Validation failed\"\n}".to_string();

    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: serde_json::to_string_pretty(&payload).unwrap_or(fallback),
    }
}

fn error_response(status_code: u16, status_text: &'static str, message: &str) -> HttpResponse {
    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: format!(
            "{{\n  \"status\": \"error\",\n  \"message\": {}\n}}",
            serde_json::to_string(message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
        ),
    }
}
