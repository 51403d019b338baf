//! Markdown summary of a dataset after stacking

use streamgraph_core::Chart;

/// Statistics for one layer, over finite thicknesses only
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSummary {
    pub key: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub nan_count: usize,
}

impl LayerSummary {
    fn from_chart(chart: &Chart) -> Vec<Self> {
        chart
            .layers
            .iter()
            .map(|layer| {
                let finite: Vec<f64> = layer
                    .bands
                    .iter()
                    .map(|b| b.thickness())
                    .filter(|t| t.is_finite())
                    .collect();
                let mean = if finite.is_empty() {
                    None
                } else {
                    Some(finite.iter().sum::<f64>() / finite.len() as f64)
                };

                Self {
                    key: layer.key.clone(),
                    min: finite.iter().copied().reduce(f64::min),
                    max: finite.iter().copied().reduce(f64::max),
                    mean,
                    nan_count: layer.nan_count(),
                }
            })
            .collect()
    }
}

/// Summary report printed by `inspect`
pub fn summary(chart: &Chart) -> String {
    let mut lines = Vec::new();

    lines.push("## Dataset Summary\n".to_string());
    lines.push(format!("- Records: {}", chart.records.len()));

    let undated = chart.records.iter().filter(|r| r.date.is_none()).count();
    match chart.scales.x {
        Some(x) => lines.push(format!("- Dates: {} to {}", x.domain.0, x.domain.1)),
        None => lines.push("- Dates: none".to_string()),
    }
    if undated > 0 {
        lines.push(format!("- Records without a valid date: {}", undated));
    }

    match chart.scales.y {
        Some(y) => lines.push(format!(
            "- Stacked extent: {} to {}",
            fmt(Some(y.domain.0)),
            fmt(Some(y.domain.1))
        )),
        None => lines.push("- Stacked extent: none".to_string()),
    }
    lines.push(String::new());

    lines.push("### Layers\n".to_string());
    lines.push("| Series | Min | Max | Mean | NaN |".to_string());
    lines.push("|--------|-----|-----|------|-----|".to_string());
    for layer in LayerSummary::from_chart(chart) {
        lines.push(format!(
            "| {} | {} | {} | {} | {} |",
            layer.key,
            fmt(layer.min),
            fmt(layer.max),
            fmt(layer.mean),
            layer.nan_count
        ));
    }

    lines.join("\n")
}

fn fmt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use streamgraph_core::ChartConfig;

    fn close(value: Option<f64>, expected: f64) -> bool {
        value.is_some_and(|v| (v - expected).abs() < 1e-9)
    }

    #[test]
    fn test_layer_summary() {
        let text = "Date,LLaMA-3.1,Claude,PaLM-2,Gemini,GPT-4\n\
                    2024-01-01,10,5,3,8,N/A\n\
                    2024-02-01,12,6,4,9,14\n\
                    2024-03-01,11,7,5,6,16\n";
        let chart = Chart::from_csv(text, &ChartConfig::default()).unwrap();
        let layers = LayerSummary::from_chart(&chart);

        assert_eq!(layers.len(), 5);
        assert_eq!(layers[4].key, "GPT-4");
        assert_eq!(layers[4].nan_count, 1);
        assert!(close(layers[4].mean, 15.0));
        assert!(close(layers[1].min, 5.0));
        assert!(close(layers[1].max, 7.0));
    }

    #[test]
    fn test_summary_report() {
        let text = "Date,LLaMA-3.1,Claude,PaLM-2,Gemini,GPT-4\n\
                    2024-01-01,10,5,3,8,12\n\
                    2024-02-01,12,6,4,9,14\n";
        let chart = Chart::from_csv(text, &ChartConfig::default()).unwrap();
        let report = summary(&chart);

        assert!(report.contains("- Records: 2"));
        assert!(report.contains("- Dates: 2024-01-01 to 2024-02-01"));
        assert!(report.contains("| GPT-4 | 12.00 | 14.00 | 13.00 | 0 |"));
        assert!(!report.contains("without a valid date"));
    }

    #[test]
    fn test_summary_without_data() {
        let chart = Chart::from_csv("Date,GPT-4\nlater,x\n", &ChartConfig::default()).unwrap();
        let report = summary(&chart);

        assert!(report.contains("- Dates: none"));
        assert!(report.contains("- Records without a valid date: 1"));
        assert!(report.contains("| LLaMA-3.1 | - | - | - | 1 |"));
    }
}
