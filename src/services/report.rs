//! Report Viewer
//!
//! Holds the last successfully fetched daily report and swaps the viewer
//! element's source. A failed fetch never reaches this state, so the previous
//! document stays on screen.

use chrono::NaiveDate;

use crate::constants::REPORT_VIEWER_CLASSES;
use crate::error::{Error, Result};
use crate::page::document::Document;
use crate::services::client::ReportDocument;

/// Report currently shown by the viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedReport {
    pub date: NaiveDate,
    /// Object-URL style token written to the viewer's `src`
    pub source: String,
    pub document: ReportDocument,
}

/// State of the report viewer
#[derive(Debug, Clone, Default)]
pub struct ReportViewer {
    current: Option<LoadedReport>,
    swaps: u64,
}

impl ReportViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&LoadedReport> {
        self.current.as_ref()
    }

    /// Number of successful swaps
    pub fn swaps(&self) -> u64 {
        self.swaps
    }

    /// Show `report` and point the page's viewer element at it
    pub fn swap(&mut self, report: ReportDocument, date: NaiveDate, page: &mut Document) -> &LoadedReport {
        let source = format!("blob:report-{}", uuid::Uuid::new_v4());

        for class in REPORT_VIEWER_CLASSES {
            if let Some(element) = page.first_with_class_mut(class) {
                element.attributes.insert("src".to_string(), source.clone());
                break;
            }
        }

        self.swaps += 1;
        self.current.insert(LoadedReport {
            date,
            source,
            document: report,
        })
    }
}

/// Check that a fetched body is a renderable PDF
pub fn validate_report(report: &ReportDocument) -> Result<()> {
    if report.content_type.contains("json") {
        let message = serde_json::from_slice::<serde_json::Value>(&report.bytes)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
            .unwrap_or_else(|| "Report endpoint returned JSON instead of a document".to_string());
        return Err(Error::Application {
            message: Some(message),
        });
    }
    if !report.bytes.starts_with(b"%PDF") {
        return Err(Error::MalformedResponse {
            message: "Report is not a PDF document".to_string(),
        });
    }
    Ok(())
}
