//! README renderer: serves the project README as HTML at `/README`.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use pulldown_cmark::{html, Options, Parser};

use super::app::AppState;
use crate::error::ApiError;

/// README route.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/README", get(readme))
}

/// Render the configured markdown file as HTML.
///
/// A missing file is the template's one explicit failure path: it maps to
/// 404 with a fixed message rather than a server error.
async fn readme(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let path = &state.config.readme_path;
    let markdown = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(target: "bedrock::readme", path = %path.display(), "✖ README missing");
            return Err(ApiError::not_found("README.md file not found"));
        }
        Err(e) => {
            tracing::error!(target: "bedrock::readme", path = %path.display(), error = %e, "✖ README read failed");
            return Err(ApiError::internal(format!("failed to read README: {e}")));
        }
    };

    Ok(Html(render_markdown(&markdown)))
}

/// Convert markdown text to an HTML fragment.
fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::io::Write;
    use tower::ServiceExt;

    #[test]
    fn test_render_markdown_heading() {
        let html = render_markdown("# Title\n\nSome *emphasis*.");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<em>emphasis</em>"));
    }

    #[test]
    fn test_render_markdown_table() {
        let html = render_markdown("| a | b |\n|---|---|\n| 1 | 2 |");
        assert!(html.contains("<table>"));
    }

    #[tokio::test]
    async fn test_readme_present() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# Demo\n\nhello from disk").unwrap();

        let state = Arc::new(AppState::new(Config {
            readme_path: file.path().to_path_buf(),
            ..Default::default()
        }));
        let response = router()
            .with_state(state)
            .oneshot(
                Request::builder()
                    .uri("/README")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(body.contains("<h1>Demo</h1>"));
        assert!(body.contains("hello from disk"));
    }

    #[tokio::test]
    async fn test_readme_missing() {
        let state = Arc::new(AppState::new(Config {
            readme_path: "/definitely/not/here/README.md".into(),
            ..Default::default()
        }));
        let response = router()
            .with_state(state)
            .oneshot(
                Request::builder()
                    .uri("/README")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["code"], "E_NOT_FOUND");
        assert_eq!(json["message"], "README.md file not found");
    }
}
