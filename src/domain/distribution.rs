// Stacked-bar decomposition of a five-number summary
use super::equipment::Parameter;
use super::statistics::FiveNumberSummary;
use serde::{Deserialize, Serialize};

/// Color tokens for one parameter: four segment shades, darkest first.
/// The first shade doubles as the parameter's series color.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParameterPalette {
    pub parameter: Parameter,
    pub colors: [String; 4],
}

impl ParameterPalette {
    pub fn new(parameter: Parameter, colors: [&str; 4]) -> Self {
        Self {
            parameter,
            colors: colors.map(str::to_string),
        }
    }

    pub fn series_color(&self) -> &str {
        &self.colors[0]
    }
}

/// One slice of a stacked bar: the gap between two adjacent order statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackedSegment {
    pub label: String,
    pub length: f64,
    pub color_token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterDistribution {
    pub parameter: Parameter,
    pub summary: FiveNumberSummary,
    pub segments: [StackedSegment; 4],
}

/// Split `[min, max]` into four consecutive segments. Each label names the
/// statistic the segment starts at, rendered with two decimals.
pub fn decompose(summary: &FiveNumberSummary, palette: &ParameterPalette) -> [StackedSegment; 4] {
    let bounds = [
        ("Min", summary.min, summary.q1),
        ("Q1", summary.q1, summary.median),
        ("Median", summary.median, summary.q3),
        ("Q3", summary.q3, summary.max),
    ];

    std::array::from_fn(|i| {
        let (name, start, end) = bounds[i];
        StackedSegment {
            label: format!("{}: {}", name, to_fixed_2(start)),
            length: end - start,
            color_token: palette.colors[i].clone(),
        }
    })
}

/// Two-decimal rendering that rounds exact ties away from zero.
///
/// `{:.2}` rounds ties to even, so 0.125 would print as 0.12. Exact ties at
/// the second decimal are the odd multiples of 1/8; everything else already
/// rounds to the nearest value.
fn to_fixed_2(value: f64) -> String {
    if value == 0.0 {
        return "0.00".to_string();
    }

    let magnitude = value.abs();
    let eighths = magnitude * 8.0;
    if eighths.fract() == 0.0 && eighths % 2.0 == 1.0 {
        let hundredths = (magnitude * 100.0).ceil() as u64;
        let sign = if value < 0.0 { "-" } else { "" };
        return format!("{}{}.{:02}", sign, hundredths / 100, hundredths % 100);
    }

    format!("{:.2}", value)
}
