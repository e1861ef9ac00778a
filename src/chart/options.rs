//! Chart Options - Declarative Description Handed to the Rendering Facade

use chrono::NaiveDate;

use crate::domain::chart_type::ChartType;
use crate::domain::farm::ChartDataset;
use crate::domain::unit::VolumeUnit;
use crate::utils::format::{format_date, format_decimal, format_rounded};

/// Chart family chosen from the dataset shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartFamily {
    /// Dated x-axis, used when any farm has more than one sample
    TimeSeries,
    /// One category per farm
    Categorical,
}

impl ChartFamily {
    pub fn for_dataset(dataset: &ChartDataset) -> Self {
        if dataset.has_multiple_dates_per_farm() {
            ChartFamily::TimeSeries
        } else {
            ChartFamily::Categorical
        }
    }
}

/// X-axis position of a point
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointX {
    Date(NaiveDate),
    Category(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub x: PointX,
    /// Value in stored units
    pub y: f64,
}

/// One plotted series; one per farm
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesOptions {
    pub farm_id: String,
    pub name: String,
    pub chart_type: ChartType,
    pub color: String,
    pub visible: bool,
    pub data: Vec<SeriesPoint>,
}

/// Value formatting shared by the tooltip and y-axis labels.
///
/// Applies the unit factor at display time; series data stay in stored units.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueFormat {
    pub unit_label: String,
    pub factor: f64,
    pub decimals: usize,
}

impl ValueFormat {
    pub fn for_unit(unit: VolumeUnit) -> Self {
        Self {
            unit_label: unit.label().to_string(),
            factor: unit.factor(),
            decimals: 2,
        }
    }

    /// Tooltip line for one point
    pub fn tooltip(&self, series_name: &str, value: f64) -> String {
        format!(
            "{series_name}: {} {}",
            format_decimal(value * self.factor, self.decimals),
            self.unit_label
        )
    }

    /// Axis tick label
    pub fn axis_label(&self, value: f64) -> String {
        format_rounded(value * self.factor)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct XAxis {
    pub title: String,
    pub family: ChartFamily,
    /// Category names; empty for time series
    pub categories: Vec<String>,
}

/// Full chart description
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub title: String,
    pub chart_type: ChartType,
    pub x_axis: XAxis,
    pub y_axis_title: String,
    pub value_format: ValueFormat,
    pub legend_enabled: bool,
    pub series: Vec<SeriesOptions>,
}

impl ChartOptions {
    /// Options for a fresh chart
    pub fn new(chart_type: ChartType, unit: VolumeUnit) -> Self {
        Self {
            title: String::new(),
            chart_type,
            x_axis: XAxis {
                title: "Farm".to_string(),
                family: ChartFamily::Categorical,
                categories: Vec::new(),
            },
            y_axis_title: unit.axis_title(),
            value_format: ValueFormat::for_unit(unit),
            legend_enabled: true,
            series: Vec::new(),
        }
    }

    pub fn family(&self) -> ChartFamily {
        self.x_axis.family
    }

    /// Replace series and x-axis layout from `dataset`, keeping titles and legend.
    ///
    /// `visible` decides each farm's initial series visibility.
    pub fn apply_dataset(&mut self, dataset: &ChartDataset, visible: impl Fn(&str) -> bool) {
        let family = ChartFamily::for_dataset(dataset);
        self.x_axis.family = family;

        match family {
            ChartFamily::TimeSeries => {
                self.x_axis.title = "Date".to_string();
                self.x_axis.categories.clear();
            }
            ChartFamily::Categorical => {
                self.x_axis.title = "Farm".to_string();
                self.x_axis.categories = dataset.farms.iter().map(|f| f.name.clone()).collect();
            }
        }

        self.series = dataset
            .farms
            .iter()
            .enumerate()
            .map(|(index, farm)| SeriesOptions {
                farm_id: farm.id.clone(),
                name: farm.name.clone(),
                chart_type: self.chart_type,
                color: farm.color.clone(),
                visible: visible(&farm.id),
                data: match family {
                    ChartFamily::TimeSeries => farm
                        .volumes
                        .iter()
                        .map(|s| SeriesPoint {
                            x: PointX::Date(s.date),
                            y: s.value,
                        })
                        .collect(),
                    ChartFamily::Categorical => vec![SeriesPoint {
                        x: PointX::Category(index),
                        y: farm.latest_value(),
                    }],
                },
            })
            .collect();
    }

    /// Switch every series to `chart_type`
    pub fn set_chart_type(&mut self, chart_type: ChartType) {
        self.chart_type = chart_type;
        for series in &mut self.series {
            series.chart_type = chart_type;
        }
    }

    /// Rewrite unit-dependent presentation
    pub fn apply_unit(&mut self, unit: VolumeUnit) {
        self.y_axis_title = unit.axis_title();
        self.value_format = ValueFormat::for_unit(unit);
    }
}

/// Chart title embedding the converted, rounded running total
pub fn volume_title(date: NaiveDate, total: f64, unit: VolumeUnit) -> String {
    format!(
        "Daily Volume by Farm - {} (Total: {} {})",
        format_date(&date),
        format_rounded(total * unit.factor()),
        unit.label()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::farm::{FarmSeries, VolumeSample};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("date")
    }

    fn farm(id: &str, samples: &[(&str, f64)]) -> FarmSeries {
        FarmSeries {
            id: id.into(),
            name: format!("Name {id}"),
            volumes: samples
                .iter()
                .map(|(d, v)| VolumeSample {
                    date: date(d),
                    value: *v,
                })
                .collect(),
            color: "#112233".into(),
        }
    }

    #[test]
    fn test_family_switch_keeps_titles_and_legend() {
        let mut options = ChartOptions::new(ChartType::Column, VolumeUnit::Gallons);
        options.title = "Custom".into();
        options.legend_enabled = false;

        let single = ChartDataset {
            farms: vec![farm("a", &[("2024-01-01", 1.0)])],
        };
        options.apply_dataset(&single, |_| true);
        assert_eq!(options.family(), ChartFamily::Categorical);
        assert_eq!(options.x_axis.categories, vec!["Name a".to_string()]);

        let multi = ChartDataset {
            farms: vec![farm("a", &[("2024-01-01", 1.0), ("2024-01-02", 2.0)])],
        };
        options.apply_dataset(&multi, |_| false);
        assert_eq!(options.family(), ChartFamily::TimeSeries);
        assert!(options.x_axis.categories.is_empty());
        assert_eq!(options.series[0].data.len(), 2);
        assert!(!options.series[0].visible);
        assert_eq!(options.title, "Custom");
        assert!(!options.legend_enabled);
        assert_eq!(options.y_axis_title, "Volume (Gallons)");
    }

    #[test]
    fn test_unit_conversion_is_presentation_only() {
        let mut options = ChartOptions::new(ChartType::Line, VolumeUnit::Gallons);
        let dataset = ChartDataset {
            farms: vec![farm("a", &[("2024-01-01", 100.0)])],
        };
        options.apply_dataset(&dataset, |_| true);
        options.apply_unit(VolumeUnit::Liters);

        assert_eq!(options.series[0].data[0].y, 100.0);
        assert_eq!(options.y_axis_title, "Volume (Liters)");
        assert_eq!(options.value_format.tooltip("Farm", 100.0), "Farm: 378.54 Liters");
    }

    #[test]
    fn test_volume_title() {
        assert_eq!(
            volume_title(date("2024-02-01"), 1000.0, VolumeUnit::Liters),
            "Daily Volume by Farm - 2024-02-01 (Total: 3,785 Liters)"
        );
    }
}
