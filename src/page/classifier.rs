//! Page Classifier
//!
//! Picks the page type from the URL path and the DOM snapshot. First match wins:
//! production path, chart containers, report viewer, dashboard widgets.

use crate::constants::{CHART_CONTAINER_IDS, DASHBOARD_CLASSES, REPORT_VIEWER_CLASSES};
use crate::domain::page_type::PageType;
use crate::page::document::Document;

/// Classify the page. Pure; absent signals fall through to `Unknown`.
pub fn classify(document: &Document) -> PageType {
    let page_type = if document.path().contains("/production") {
        PageType::Production
    } else if CHART_CONTAINER_IDS.iter().any(|id| document.contains_id(id)) {
        PageType::Chart
    } else if REPORT_VIEWER_CLASSES.iter().any(|c| document.has_class(c)) {
        PageType::Report
    } else if DASHBOARD_CLASSES.iter().any(|c| document.has_class(c)) {
        PageType::Dashboard
    } else {
        PageType::Unknown
    };

    tracing::debug!(path = document.path(), %page_type, "Classified page");
    page_type
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::document::Element;

    #[test]
    fn test_production_path_wins() {
        let doc = Document::new("/production/daily")
            .with_element(Element::new("div").with_id("dailyVolumeChart"))
            .with_element(Element::new("div").with_class("dashboard-card"));
        assert_eq!(classify(&doc), PageType::Production);
    }

    #[test]
    fn test_chart_before_report() {
        let doc = Document::new("/charts")
            .with_element(Element::new("div").with_class("pdf-container"))
            .with_element(Element::new("div").with_id("monthlyVolumeChart"));
        assert_eq!(classify(&doc), PageType::Chart);
    }

    #[test]
    fn test_report_before_dashboard() {
        let doc = Document::new("/reports")
            .with_element(Element::new("div").with_class("dashboard-widget"))
            .with_element(Element::new("iframe").with_class("pdf-viewer"));
        assert_eq!(classify(&doc), PageType::Report);
    }

    #[test]
    fn test_dashboard_and_unknown() {
        let doc = Document::new("/").with_element(Element::new("div").with_class("dashboard-card"));
        assert_eq!(classify(&doc), PageType::Dashboard);
        assert_eq!(classify(&Document::new("/settings")), PageType::Unknown);
    }
}
