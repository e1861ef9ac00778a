//! Page Context
//!
//! Reads of the DOM contract shared by chart controllers and refresh strategies:
//! active company, selected date and selected unit.

use chrono::NaiveDate;

use crate::constants::{
    COMPANY_CONTAINER_ID, COMPANY_ID_ATTRIBUTE, COMPANY_ID_SENTINELS, DATE_INPUT_ID, UNIT_SELECT_ID,
};
use crate::domain::unit::VolumeUnit;
use crate::error::{Error, Result};
use crate::page::document::Document;

/// Attribute carrying the company display name
pub const COMPANY_NAME_ATTRIBUTE: &str = "data-company-name";

/// Active company id; fails fast on missing or placeholder values
pub fn resolve_company_id(document: &Document) -> Result<String> {
    let Some(raw) = document.attribute(COMPANY_CONTAINER_ID, COMPANY_ID_ATTRIBUTE) else {
        return Err(Error::configuration(
            "Company ID not found. Please select a company first.",
        ));
    };

    let id = raw.trim();
    if id.is_empty() || COMPANY_ID_SENTINELS.iter().any(|s| id.eq_ignore_ascii_case(s)) {
        return Err(Error::configuration(
            "No company selected. Please select a company to view farm volumes.",
        ));
    }
    Ok(id.to_string())
}

/// Company display name, if the page renders one
pub fn company_name(document: &Document) -> Option<String> {
    document
        .attribute(COMPANY_CONTAINER_ID, COMPANY_NAME_ATTRIBUTE)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Date currently selected in the date input
pub fn selected_date(document: &Document) -> Option<NaiveDate> {
    document
        .input_value(DATE_INPUT_ID)
        .and_then(|v| NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d").ok())
}

/// Unit currently selected in the unit select
pub fn selected_unit(document: &Document) -> Option<VolumeUnit> {
    document
        .input_value(UNIT_SELECT_ID)
        .and_then(|v| v.parse().ok())
}
