//! Standalone HTML page around a rendered streamgraph

use crate::error::Result;
use minijinja::{context, Environment};
use serde::Serialize;
use streamgraph_core::{Chart, Scene};

/// HTML template for the report page
const REPORT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{ title }}</title>
    <style>
        :root {
            --bg-primary: #0d1117;
            --bg-secondary: #161b22;
            --text-primary: #c9d1d9;
            --text-muted: #6e7681;
            --border-color: #30363d;
        }

        * {
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif;
            background: var(--bg-primary);
            color: var(--text-primary);
            line-height: 1.6;
        }

        .container {
            max-width: {{ width + 64 }}px;
            margin: 0 auto;
            padding: 2rem;
        }

        h1 {
            font-size: 1.5rem;
            font-weight: 600;
            margin-bottom: 0.25rem;
        }

        .subtitle {
            color: var(--text-muted);
            font-size: 0.9rem;
            margin-bottom: 1rem;
        }

        .legend {
            display: flex;
            flex-wrap: wrap;
            gap: 1rem;
            margin-bottom: 1rem;
            font-size: 0.9rem;
        }

        .swatch {
            display: inline-block;
            width: 12px;
            height: 12px;
            margin-right: 0.35rem;
            vertical-align: middle;
        }

        .chart {
            background: var(--bg-secondary);
            border: 1px solid var(--border-color);
            border-radius: 8px;
            color: var(--text-muted);
        }

        .chart svg .legend { display: none; }
    </style>
</head>
<body>
    <div class="container">
        <h1>{{ title }}</h1>
        {% if date_range %}
        <p class="subtitle">{{ record_count }} records, {{ date_range }}</p>
        {% else %}
        <p class="subtitle">{{ record_count }} records, no valid dates</p>
        {% endif %}
        <div class="legend">
            {% for entry in legend %}
            <span><span class="swatch" style="background: {{ entry.color }}"></span>{{ entry.key }}</span>
            {% endfor %}
        </div>
        <div class="chart">
{{ svg | safe }}
        </div>
    </div>
</body>
</html>
"#;

/// Legend entry data for template
#[derive(Debug, Clone, Serialize)]
struct LegendItem {
    key: String,
    color: String,
}

fn legend_items(scene: &Scene) -> Vec<LegendItem> {
    scene
        .legend
        .iter()
        .map(|entry| LegendItem {
            key: entry.key.clone(),
            color: entry.color.clone(),
        })
        .collect()
}

/// Render the chart as a self-contained HTML page
pub fn render_page(chart: &Chart, title: &str) -> Result<String> {
    let mut env = Environment::new();
    // the .html name turns on auto-escaping
    env.add_template("report.html", REPORT_TEMPLATE)?;

    let template = env.get_template("report.html")?;

    let date_range = chart
        .scales
        .x
        .map(|x| format!("{} to {}", x.domain.0, x.domain.1));

    let html = template.render(context! {
        title => title,
        width => chart.scene.width,
        record_count => chart.records.len(),
        date_range => date_range,
        legend => legend_items(&chart.scene),
        svg => chart.scene.to_svg(),
    })?;

    Ok(html)
}
