//! Documentation mounting: Swagger UI, ReDoc, and the OpenAPI schema.
//!
//! The interactive pages are self-contained HTML documents referencing the
//! vendored assets under `/static`; the schema itself is generated at compile
//! time from the handler annotations via `utoipa`. Large HTML blobs live in
//! consts to avoid runtime template dependencies.

use std::sync::Arc;

use axum::extract::State;
use axum::response::{Html, Redirect};
use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::app::AppState;

/// Where the OpenAPI document is served.
pub const OPENAPI_PATH: &str = "/openapi.json";
/// OAuth2 redirect helper used by the Swagger UI authorization flow.
pub const OAUTH2_REDIRECT_PATH: &str = "/docs/oauth2-redirect";

const SWAGGER_JS_URL: &str = "/static/swagger-ui-bundle.js";
const SWAGGER_CSS_URL: &str = "/static/swagger-ui.css";
const REDOC_JS_URL: &str = "/static/redoc.standalone.js";

/// OpenAPI document assembled from the annotated handlers.
#[derive(OpenApi)]
#[openapi(
    paths(
        super::health::healthz,
        super::health::readyz,
        super::auth::issue_token,
        super::example::hello,
        super::example::error_demo,
        super::example::data,
        super::example::list_items,
        super::example::create_item,
        super::example::get_item,
        super::example::update_item,
        super::example::delete_item,
        super::example::items_paged,
        super::example::profile,
    ),
    components(schemas(
        crate::error::ErrorResponse,
        crate::error::ErrorCode,
        super::envelope::PaginationMeta,
        super::example::Item,
        super::auth::User,
    )),
    tags(
        (name = "health", description = "Liveness and readiness probes"),
        (name = "auth", description = "Demo token flow"),
        (name = "example", description = "Starter endpoints meant to be replaced"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

/// Registers the bearer scheme referenced by protected endpoints.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

/// Documentation routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .route("/docs", get(swagger_ui))
        .route(OAUTH2_REDIRECT_PATH, get(oauth2_redirect))
        .route("/redoc", get(redoc))
        .route(OPENAPI_PATH, get(openapi))
}

/// The landing path points at the interactive docs.
async fn root() -> Redirect {
    Redirect::to("/docs")
}

const SWAGGER_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<link type="text/css" rel="stylesheet" href="%SWAGGER_CSS%">
<title>%TITLE% - Swagger UI</title>
</head>
<body>
<div id="swagger-ui"></div>
<script src="%SWAGGER_JS%"></script>
<script>
const ui = SwaggerUIBundle({
    url: '%OPENAPI%',
    dom_id: '#swagger-ui',
    presets: [
        SwaggerUIBundle.presets.apis,
        SwaggerUIBundle.SwaggerUIStandalonePreset
    ],
    layout: 'BaseLayout',
    deepLinking: true,
    showExtensions: true,
    showCommonExtensions: true,
    oauth2RedirectUrl: window.location.origin + '%OAUTH2_REDIRECT%'
})
</script>
</body>
</html>
"#;

/// Interactive Swagger UI page.
async fn swagger_ui(State(state): State<Arc<AppState>>) -> Html<String> {
    let page = SWAGGER_TEMPLATE
        .replace("%TITLE%", &state.config.title)
        .replace("%SWAGGER_CSS%", SWAGGER_CSS_URL)
        .replace("%SWAGGER_JS%", SWAGGER_JS_URL)
        .replace("%OPENAPI%", OPENAPI_PATH)
        .replace("%OAUTH2_REDIRECT%", OAUTH2_REDIRECT_PATH);
    Html(page)
}

/// OAuth2 redirect helper page consumed by Swagger UI popups.
///
/// Relays the authorization response from the query/fragment back to the
/// opener window, as the bundled `oauth2-redirect.html` of Swagger UI does.
const OAUTH2_REDIRECT_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Swagger UI: OAuth2 Redirect</title>
</head>
<body>
<script>
'use strict';
function run() {
    var oauth2 = window.opener.swaggerUIRedirectOauth2;
    var sentState = oauth2.state;
    var redirectUrl = oauth2.redirectUrl;
    var isValid, qp, arr;

    if (/code|token|error/.test(window.location.hash)) {
        qp = window.location.hash.substring(1);
    } else {
        qp = location.search.substring(1);
    }

    arr = qp.split("&");
    arr.forEach(function (v, i, _arr) { _arr[i] = '"' + v.replace('=', '":"') + '"'; });
    qp = qp ? JSON.parse('{' + arr.join() + '}',
            function (key, value) {
                return key === "" ? value : decodeURIComponent(value);
            }
    ) : {};

    isValid = qp.state === sentState;

    if ((
      oauth2.auth.schema.get("flow") === "accessCode" ||
      oauth2.auth.schema.get("flow") === "authorizationCode" ||
      oauth2.auth.schema.get("flow") === "authorization_code"
    ) && !oauth2.auth.code) {
        if (!isValid) {
            oauth2.errCb({
                authId: oauth2.auth.name,
                source: "auth",
                level: "warning",
                message: "Authorization may be unsafe, passed state was changed in server. The passed state wasn't returned from auth server."
            });
        }

        if (qp.code) {
            delete oauth2.state;
            oauth2.auth.code = qp.code;
            oauth2.callback({auth: oauth2.auth, redirectUrl: redirectUrl});
        } else {
            let oauthErrorMsg;
            if (qp.error) {
                oauthErrorMsg = "["+qp.error+"]: " +
                    (qp.error_description ? qp.error_description+ ". " : "no accessCode received from the server. ") +
                    (qp.error_uri ? "More info: "+qp.error_uri : "");
            }

            oauth2.errCb({
                authId: oauth2.auth.name,
                source: "auth",
                level: "error",
                message: oauthErrorMsg || "[Authorization failed]: no accessCode received from the server."
            });
        }
    } else {
        oauth2.callback({auth: oauth2.auth, token: qp, isValid: isValid, redirectUrl: redirectUrl});
    }
    window.close();
}

if (document.readyState !== 'loading') {
    run();
} else {
    document.addEventListener('DOMContentLoaded', function () {
        run();
    });
}
</script>
</body>
</html>
"#;

async fn oauth2_redirect() -> Html<&'static str> {
    Html(OAUTH2_REDIRECT_PAGE)
}

const REDOC_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>%TITLE% - ReDoc</title>
<meta name="viewport" content="width=device-width, initial-scale=1">
<style>
body {
    margin: 0;
    padding: 0;
}
</style>
</head>
<body>
<redoc spec-url="%OPENAPI%"></redoc>
<script src="%REDOC_JS%"></script>
</body>
</html>
"#;

/// Reference documentation page.
async fn redoc(State(state): State<Arc<AppState>>) -> Html<String> {
    let page = REDOC_TEMPLATE
        .replace("%TITLE%", &state.config.title)
        .replace("%OPENAPI%", OPENAPI_PATH)
        .replace("%REDOC_JS%", REDOC_JS_URL);
    Html(page)
}

/// The OpenAPI document, with title and description taken from the config.
async fn openapi(State(state): State<Arc<AppState>>) -> Json<utoipa::openapi::OpenApi> {
    let mut doc = ApiDoc::openapi();
    doc.info.title = state.config.title.clone();
    doc.info.version = env!("CARGO_PKG_VERSION").to_string();
    doc.info.description = Some(
        "Starter web API. For project details see [README](/README).".to_string(),
    );
    Json(doc)
}
