use astra::{Request, Response};
use http::Method;

use crate::auth::USER_HEADER;
use crate::errors::ServerError;
use crate::handlers::{self, parse_query, read_json, Ctx};
use crate::responses::{error_to_response, preflight, ResultResp};
use crate::state::AppState;

/// Entry point for every request. Errors become the JSON error envelope.
pub fn handle(req: Request, state: &AppState) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    match route(req, state) {
        Ok(resp) => {
            tracing::debug!(%method, %path, status = resp.status().as_u16(), "handled");
            resp
        }
        Err(err) => {
            tracing::info!(%method, %path, status = err.status(), "request failed");
            error_to_response(err)
        }
    }
}

/// Path segments with an optional leading `api`.
fn segments(path: &str) -> Vec<&str> {
    let mut segs: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segs.first() == Some(&"api") {
        segs.remove(0);
    }
    segs
}

fn route(req: Request, state: &AppState) -> ResultResp {
    if *req.method() == Method::OPTIONS {
        return preflight();
    }

    let path = req.uri().path().to_string();
    let method = req.method().as_str().to_string();
    let user = req
        .headers()
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let ctx = Ctx {
        state,
        who: state.auth.resolve(user.as_deref()),
        query: parse_query(&req),
    };

    use handlers::{disasters, events, geocode, reports, resources, social, verification};

    match (method.as_str(), segments(&path).as_slice()) {
        ("GET", ["disasters"]) => disasters::list(&ctx),
        ("POST", ["disasters"]) => disasters::create(&ctx, read_json(req)?),
        ("GET", ["disasters", id]) => disasters::get(&ctx, id),
        ("PUT", ["disasters", id]) => disasters::update(&ctx, id, read_json(req)?),
        ("DELETE", ["disasters", id]) => disasters::delete(&ctx, id),
        ("GET", ["disasters", id, "official-updates"]) => disasters::official_updates(&ctx, id),

        ("POST", ["geocode"]) => geocode::geocode(&ctx, read_json(req)?),

        ("POST", ["verification", "disasters", id, "verify-image"]) => {
            verification::verify_image(&ctx, id, read_json(req)?)
        }

        ("GET", ["resources", "disasters", id, "resources"]) => resources::list(&ctx, id),
        ("POST", ["resources", "disasters", id, "resources"]) => {
            resources::create(&ctx, id, read_json(req)?)
        }
        ("DELETE", ["resources", "disasters", id, "resources", resource_id]) => {
            resources::delete(&ctx, id, resource_id)
        }

        ("POST", ["reports", "disasters", id, "reports"]) => {
            reports::create(&ctx, id, read_json(req)?)
        }
        ("GET", ["reports", "disasters", id, "reports"]) => reports::list(&ctx, id),
        ("PUT", ["reports", id]) => reports::set_status(&ctx, id, read_json(req)?),

        ("GET", ["social-media", "disasters", id, "social-media"]) => social::feed(&ctx, id),
        ("GET", ["social-media", "mock-social-media"]) => social::mock_feed(&ctx),

        ("GET", ["events"]) => events::stream(&ctx),

        _ => Err(ServerError::NotFound(format!("No route for {method} {path}"))),
    }
}
