// src/render/mod.rs
//! Renders the single translator page from `templates/page.html`.

use askama::Template;

use crate::health::HealthStatus;
use crate::proxy::TranslationOutcome;

const STYLE: &str = include_str!("page.css");

/// Status banner shown on page load.
#[derive(Debug)]
pub struct Banner {
    pub class: &'static str,
    pub icon: &'static str,
    pub message: String,
}

/// Translation or error block shown after a submission.
#[derive(Debug)]
pub struct ResultBlock {
    pub class: &'static str,
    pub heading: &'static str,
    pub text: String,
}

/// The translator page. Every `{{ }}` value except the stylesheet is
/// HTML-escaped by the template engine.
#[derive(Template, Debug)]
#[template(path = "page.html")]
pub struct Page<'a> {
    pub style: &'a str,
    pub submitted: &'a str,
    pub banner: Option<Banner>,
    pub result: Option<ResultBlock>,
}

impl<'a> Page<'a> {
    pub fn new(
        submitted: Option<&'a str>,
        status: Option<&HealthStatus>,
        outcome: Option<&TranslationOutcome>,
    ) -> Self {
        Self {
            style: STYLE,
            submitted: submitted.unwrap_or(""),
            banner: status.map(banner),
            result: outcome.map(result_block),
        }
    }
}

/// Builds the full HTML document. Output depends only on the arguments.
pub fn render_page(
    submitted: Option<&str>,
    status: Option<&HealthStatus>,
    outcome: Option<&TranslationOutcome>,
) -> askama::Result<String> {
    Page::new(submitted, status, outcome).render()
}

fn banner(status: &HealthStatus) -> Banner {
    let (class, icon) = match status {
        HealthStatus::Connected => ("connected", "✅"),
        HealthStatus::BadStatus(_) => ("disconnected", "⚠️"),
        HealthStatus::Unreachable => ("disconnected", "❌"),
    };

    Banner {
        class,
        icon,
        message: status.message(),
    }
}

fn result_block(outcome: &TranslationOutcome) -> ResultBlock {
    let (class, heading) = if outcome.is_failure() {
        ("result error", "❌ Error")
    } else {
        ("result", "✅ Translation")
    };

    ResultBlock {
        class,
        heading,
        text: outcome.text(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::TranslateError;
    use reqwest::StatusCode;

    #[test]
    fn test_first_load_has_form_only() {
        let html = render_page(None, None, None).unwrap();

        assert!(html.contains("<form method=\"POST\">"));
        assert!(html.contains("required></textarea>"));
        assert!(!html.contains("class=\"status"));
        assert!(!html.contains("class=\"result"));
    }

    #[test]
    fn test_stylesheet_is_not_escaped() {
        let html = render_page(None, None, None).unwrap();
        assert!(html.contains("font-family: 'Segoe UI', Tahoma"));
    }

    #[test]
    fn test_connected_banner() {
        let html = render_page(None, Some(&HealthStatus::Connected), None).unwrap();

        assert!(html.contains("<div class=\"status connected\">✅ Connected to server</div>"));
        assert!(!html.contains("status disconnected"));
    }

    #[test]
    fn test_disconnected_banners() {
        let html = render_page(None, Some(&HealthStatus::Unreachable), None).unwrap();
        assert!(html.contains("status disconnected"));
        assert!(html.contains("Cannot connect to server - check the remote URL"));

        let html = render_page(
            None,
            Some(&HealthStatus::BadStatus(StatusCode::SERVICE_UNAVAILABLE)),
            None,
        )
        .unwrap();
        assert!(html.contains("status disconnected"));
        assert!(html.contains("Server returned status 503"));
    }

    #[test]
    fn test_success_block() {
        let outcome = TranslationOutcome::Success("Hello".into());
        let html = render_page(Some("namaste"), None, Some(&outcome)).unwrap();

        assert!(html.contains("<div class=\"result\">"));
        assert!(html.contains("<h3>✅ Translation</h3>"));
        assert!(html.contains("<p>Hello</p>"));
        assert!(html.contains("required>namaste</textarea>"));
        assert!(!html.contains("result error"));
    }

    #[test]
    fn test_failure_block() {
        let outcome = TranslationOutcome::Failure(TranslateError::Timeout);
        let html = render_page(Some("x"), None, Some(&outcome)).unwrap();

        assert!(html.contains("<div class=\"result error\">"));
        assert!(html.contains("<h3>❌ Error</h3>"));
        assert!(html.contains("Request timed out."));
    }

    #[test]
    fn test_success_mentioning_error_is_not_styled_as_error() {
        let outcome = TranslationOutcome::Success("terror and error".into());
        let html = render_page(None, None, Some(&outcome)).unwrap();
        assert!(!html.contains("result error"));
    }

    #[test]
    fn test_dynamic_text_is_escaped() {
        let outcome = TranslationOutcome::Success("<b>\"hi\" & bye</b>".into());
        let html = render_page(Some("</textarea><script>"), None, Some(&outcome)).unwrap();

        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("</textarea><script>"));
        assert!(!html.contains("<script>"));

        assert!(html.contains("&lt;b&gt;&quot;hi&quot; &amp; bye"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let outcome = TranslationOutcome::Success("same".into());
        assert_eq!(
            render_page(Some("t"), None, Some(&outcome)).unwrap(),
            render_page(Some("t"), None, Some(&outcome)).unwrap()
        );
    }
}
