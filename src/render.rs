use crate::config::Design;
use crate::error::NormalizedError;
use crate::models::Review;
use crate::theme::ColorScheme;
use crate::widget::{Widget, WidgetState};

/// Render the widget's current state as HTML for the host anchor.
///
/// All four layout variants consume the same windowed, deduplicated review
/// sequence and the same theme class; `badge` is summary-only by design and
/// never offers load-more.
pub fn render_widget(widget: &Widget) -> String {
    let scheme = widget.color_scheme();
    match widget.state() {
        WidgetState::Idle => format!(r#"<div class="rw-widget {}"></div>"#, scheme_class(scheme)),
        WidgetState::Loading => render_loading(widget.design(), scheme),
        WidgetState::Failed(error) => render_failed(error, scheme),
        WidgetState::Ready { .. } => render_ready(widget, scheme),
    }
}

fn scheme_class(scheme: ColorScheme) -> &'static str {
    match scheme {
        ColorScheme::Light => "rw-light",
        ColorScheme::Dark => "rw-dark",
    }
}

fn design_class(design: Design) -> &'static str {
    match design {
        Design::Grid => "rw-grid",
        Design::List => "rw-list",
        Design::Carousel => "rw-carousel",
        Design::Badge => "rw-badge",
    }
}

/// Star row; filled count is the rounded rating.
fn render_stars(rating: f64) -> String {
    let filled = (rating.round().clamp(0.0, 5.0)) as usize;
    let mut html = String::from(r#"<span class="rw-stars">"#);
    for i in 0..5 {
        html.push_str(if i < filled { "★" } else { "☆" });
    }
    html.push_str("</span>");
    html
}

fn render_header(average: f64, count: u64) -> String {
    format!(
        concat!(
            r#"<div class="rw-header"><h2>Customer Reviews</h2>"#,
            r#"<span class="rw-average">{:.1}</span>{}"#,
            r#"<span class="rw-count">({} reviews)</span></div>"#
        ),
        average,
        render_stars(average),
        count
    )
}

fn render_card(review: &Review) -> String {
    let avatar = review
        .avatar
        .as_deref()
        .unwrap_or("https://www.gravatar.com/avatar/?d=mp");

    format!(
        concat!(
            r#"<div class="rw-card">"#,
            r#"<img class="rw-avatar" src="{}" alt="{}">"#,
            r#"<div class="rw-meta"><h4>{}</h4><p class="rw-date">{}</p></div>"#,
            "{}",
            r#"<p class="rw-text">{}</p>"#,
            "</div>"
        ),
        escape_html(avatar),
        escape_html(&review.name),
        escape_html(&review.name),
        escape_html(&review.date),
        render_stars(review.stars as f64),
        escape_html(&review.text)
    )
}

fn render_ready(widget: &Widget, scheme: ColorScheme) -> String {
    let design = widget.design();
    let (average, count) = widget.display_summary().unwrap_or((0.0, 0));

    let mut html = format!(
        r#"<div class="rw-widget {} {}">"#,
        scheme_class(scheme),
        design_class(design)
    );
    html.push_str(&render_header(average, count));

    if design != Design::Badge {
        let columns = widget.pagination().viewport_class().columns();
        html.push_str(&format!(
            r#"<div class="rw-items rw-cols-{}">"#,
            columns
        ));
        for review in widget.visible_reviews() {
            html.push_str(&render_card(review));
        }
        html.push_str("</div>");

        if widget.has_more() {
            html.push_str(r#"<button class="rw-load-more">Load more reviews</button>"#);
        }
    }

    html.push_str("</div>");
    html
}

/// Skeleton matching the target layout's shape: header placeholder plus six
/// pulse cards (none for badge, which has no cards to begin with).
fn render_loading(design: Design, scheme: ColorScheme) -> String {
    let mut html = format!(
        r#"<div class="rw-widget rw-loading {} {}">"#,
        scheme_class(scheme),
        design_class(design)
    );
    html.push_str(r#"<div class="rw-skeleton rw-skeleton-header"></div>"#);
    if design != Design::Badge {
        html.push_str(r#"<div class="rw-items">"#);
        for _ in 0..6 {
            html.push_str(r#"<div class="rw-skeleton rw-skeleton-card"></div>"#);
        }
        html.push_str("</div>");
    }
    html.push_str("</div>");
    html
}

/// Compact error surface: message plus status/code/request id badges when
/// known. No reviews are shown in this state.
fn render_failed(error: &NormalizedError, scheme: ColorScheme) -> String {
    let mut html = format!(
        r#"<div class="rw-widget rw-error {}"><span class="rw-error-message">{}</span>"#,
        scheme_class(scheme),
        escape_html(&error.message)
    );
    if let Some(status) = error.status {
        html.push_str(&format!(r#"<span class="rw-error-status">{}</span>"#, status));
    }
    if let Some(code) = &error.code {
        html.push_str(&format!(
            r#"<span class="rw-error-code">{}</span>"#,
            escape_html(code)
        ));
    }
    if let Some(request_id) = &error.request_id {
        html.push_str(&format!(
            r#"<span class="rw-error-request">req {}</span>"#,
            escape_html(request_id)
        ));
    }
    html.push_str("</div>");
    html
}

/// Minimal escaping for text interpolated into markup; review content is
/// host-untrusted.
fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Design, ThemeSetting, WidgetConfig};
    use crate::fetch::FetchOutcome;
    use crate::host::StaticHost;
    use crate::models::ReviewBatch;

    fn ready_widget(design: Design, n: usize) -> Widget {
        let host = StaticHost {
            width: 1024,
            scheme: ColorScheme::Dark,
        };
        let config = WidgetConfig {
            public_key: Some("pk_live_abc".to_string()),
            design,
            ..Default::default()
        };
        let mut widget = Widget::mount(config, &host);
        let job = widget.begin_refresh().unwrap();
        let outcome = FetchOutcome {
            batch: ReviewBatch {
                average_rating: 4.6,
                count: n as u64,
                reviews: (0..n)
                    .map(|i| Review {
                        review_id: Some(format!("r{}", i)),
                        name: format!("Reviewer {}", i),
                        date: "2 days ago".to_string(),
                        stars: 5,
                        text: "Great place.".to_string(),
                        avatar: None,
                    })
                    .collect(),
            },
            stats: None,
        };
        widget.apply(&job.token, Ok(outcome));
        widget
    }

    #[test]
    fn test_grid_renders_window_and_load_more() {
        let widget = ready_widget(Design::Grid, 8);
        let html = render_widget(&widget);

        assert!(html.contains("rw-grid"));
        assert!(html.contains("rw-cols-3"));
        assert_eq!(html.matches("rw-card").count(), 6);
        assert!(html.contains("rw-load-more"));
        assert!(html.contains("Customer Reviews"));
    }

    #[test]
    fn test_exhausted_batch_offers_no_load_more() {
        let widget = ready_widget(Design::Grid, 4);
        let html = render_widget(&widget);
        assert_eq!(html.matches("rw-card").count(), 4);
        assert!(!html.contains("rw-load-more"));
    }

    #[test]
    fn test_badge_is_summary_only() {
        let widget = ready_widget(Design::Badge, 8);
        let html = render_widget(&widget);

        assert!(html.contains("rw-badge"));
        assert!(html.contains("rw-average"));
        assert!(html.contains("(8 reviews)"));
        // No individual reviews, no load-more affordance.
        assert!(!html.contains("rw-card"));
        assert!(!html.contains("rw-load-more"));
    }

    #[test]
    fn test_list_and_carousel_classes() {
        assert!(render_widget(&ready_widget(Design::List, 2)).contains("rw-list"));
        assert!(render_widget(&ready_widget(Design::Carousel, 2)).contains("rw-carousel"));
    }

    #[test]
    fn test_loading_skeleton() {
        let host = StaticHost::default();
        let config = WidgetConfig {
            public_key: Some("pk_live_abc".to_string()),
            ..Default::default()
        };
        let mut widget = Widget::mount(config, &host);
        let _ = widget.begin_refresh();

        let html = render_widget(&widget);
        assert!(html.contains("rw-loading"));
        assert!(html.contains("rw-skeleton-card"));
        assert!(!html.contains("rw-card\""));
    }

    #[test]
    fn test_failed_surface_carries_error_fields() {
        let host = StaticHost::default();
        let config = WidgetConfig {
            public_key: Some("missing".to_string()),
            ..Default::default()
        };
        let mut widget = Widget::mount(config, &host);
        let job = widget.begin_refresh().unwrap();
        widget.apply(
            &job.token,
            Err(crate::error::FetchError::Http(crate::error::normalize(
                404,
                "Not Found",
                Some(&serde_json::json!({"detail": "not found"})),
            ))),
        );

        let html = render_widget(&widget);
        assert!(html.contains("not found"));
        assert!(html.contains(r#"<span class="rw-error-status">404</span>"#));
        assert!(html.contains("http_404"));
        assert!(!html.contains("rw-card"));
    }

    #[test]
    fn test_theme_class_follows_setting() {
        let host = StaticHost {
            width: 1024,
            scheme: ColorScheme::Dark,
        };
        let config = WidgetConfig {
            theme: ThemeSetting::Light,
            ..Default::default()
        };
        let mut widget = Widget::mount(config, &host);
        let _ = widget.begin_refresh();

        assert!(render_widget(&widget).contains("rw-light"));
    }

    #[test]
    fn test_review_content_is_escaped() {
        let host = StaticHost::default();
        let config = WidgetConfig {
            public_key: Some("pk_live_abc".to_string()),
            ..Default::default()
        };
        let mut widget = Widget::mount(config, &host);
        let job = widget.begin_refresh().unwrap();
        widget.apply(
            &job.token,
            Ok(FetchOutcome {
                batch: ReviewBatch {
                    average_rating: 5.0,
                    count: 1,
                    reviews: vec![Review {
                        review_id: Some("r1".to_string()),
                        name: "<script>alert(1)</script>".to_string(),
                        date: "now".to_string(),
                        stars: 5,
                        text: "a & b".to_string(),
                        avatar: None,
                    }],
                },
                stats: None,
            }),
        );

        let html = render_widget(&widget);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("a &amp; b"));
    }

    #[test]
    fn test_star_row() {
        let stars = render_stars(3.4);
        assert_eq!(stars.matches('★').count(), 3);
        assert_eq!(stars.matches('☆').count(), 2);
    }
}
