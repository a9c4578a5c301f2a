//! Route labels for request metrics.

use atelier_app::domain::orders::numbers::OrderNumber;
use uuid::Uuid;

/// Collapse identifiers in `path` so every order or product shares one label.
pub(super) fn route_label(path: &str) -> String {
    let segments: Vec<&str> = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            if Uuid::parse_str(segment).is_ok() {
                "{id}"
            } else if segment.parse::<OrderNumber>().is_ok() {
                "{number}"
            } else {
                segment
            }
        })
        .collect();

    format!("/{}", segments.join("/"))
}
