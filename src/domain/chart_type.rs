//! ChartType - Selectable Visual Family per Chart Container

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Error;

/// Visual family of a chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Line,
    Column,
    Bar,
    Area,
    Spline,
}

impl ChartType {
    /// All chart types in display order
    pub const ALL: [ChartType; 5] = [
        ChartType::Line,
        ChartType::Column,
        ChartType::Bar,
        ChartType::Area,
        ChartType::Spline,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Line => "line",
            ChartType::Column => "column",
            ChartType::Bar => "bar",
            ChartType::Area => "area",
            ChartType::Spline => "spline",
        }
    }

    /// Button label
    pub fn label(&self) -> &'static str {
        match self {
            ChartType::Line => "Line",
            ChartType::Column => "Column",
            ChartType::Bar => "Bar",
            ChartType::Area => "Area",
            ChartType::Spline => "Spline",
        }
    }

    /// Icon class rendered next to the label
    pub fn icon(&self) -> &'static str {
        match self {
            ChartType::Line => "fa-chart-line",
            ChartType::Column => "fa-chart-column",
            ChartType::Bar => "fa-chart-bar",
            ChartType::Area => "fa-chart-area",
            ChartType::Spline => "fa-wave-square",
        }
    }

    /// Enabled chart types for a selector container.
    ///
    /// Lagoon charts plot levels, where bar and spline renderings are not offered.
    pub fn enabled_for_container(container_id: &str) -> Vec<ChartType> {
        if container_id.to_lowercase().contains("lagoon") {
            vec![ChartType::Line, ChartType::Column, ChartType::Area]
        } else {
            Self::ALL.to_vec()
        }
    }
}

impl std::fmt::Display for ChartType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::Invalid {
                message: format!("Unknown chart type: {s}"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lagoon_containers_get_reduced_set() {
        assert_eq!(
            ChartType::enabled_for_container("lagoonChartTypeSelector"),
            vec![ChartType::Line, ChartType::Column, ChartType::Area]
        );
        assert_eq!(
            ChartType::enabled_for_container("monthlyChartTypeSelector").len(),
            ChartType::ALL.len()
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!("Spline".parse::<ChartType>().expect("parse"), ChartType::Spline);
        assert!("pie".parse::<ChartType>().is_err());
    }
}
