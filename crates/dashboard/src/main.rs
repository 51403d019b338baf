//! Dioxus-based streamgraph dashboard
//!
//! A pure Rust frontend that compiles to WebAssembly.
//! 100% Rust - no manually written JS/TS/CSS.
//! All styling is inline in Rust code.
//!
//! ## Flow
//!
//! The user picks a CSV file. Its text goes through the core pipeline into a
//! fresh [`Chart`], which replaces whatever was shown before. Hovering a layer
//! drives a [`HoverState`]; the tooltip is derived from that state on every
//! render and disappears when the pointer leaves the layer.

use dioxus::prelude::*;
use std::rc::Rc;
use streamgraph_core::{
    Axis, AxisOrient, Chart, ChartConfig, HoverState, MiniChart, Pointer, PointerEvent, Scene,
    Tooltip,
};
use tracing::{info, warn};

mod styles;

use styles::*;

/// Global theme context - true = dark mode
#[derive(Clone, Copy)]
struct ThemeCtx(Signal<bool>);

/// A successfully built chart and the upload it came from
#[derive(Debug, Clone, PartialEq)]
struct Upload {
    /// Bumped on every successful upload so the chart view starts fresh
    generation: u64,
    file_name: String,
    chart: Chart,
}

fn main() {
    tracing_wasm::set_as_global_default();
    launch(App);
}

#[component]
fn App() -> Element {
    // Theme state - default to dark mode
    let dark_mode = use_signal(|| true);
    use_context_provider(|| ThemeCtx(dark_mode));

    let config = use_hook(ChartConfig::default);
    let upload = use_signal(|| None::<Upload>);
    let error = use_signal(|| None::<String>);

    let dark = *dark_mode.read();

    rsx! {
        div { style: "{app_style(dark)}",
            Header { config: config.clone(), upload, error }

            main { style: "{main_content_style()}",
                if let Some(message) = error.read().as_ref() {
                    ErrorBanner { message: message.clone() }
                }

                if let Some(current) = upload.read().as_ref() {
                    Legend { scene: current.chart.scene.clone() }
                    StreamChart {
                        key: "{current.generation}",
                        chart: current.chart.clone(),
                        config: config.clone()
                    }
                } else {
                    EmptyState {}
                }
            }
        }
    }
}

#[component]
fn Header(
    config: ChartConfig,
    upload: Signal<Option<Upload>>,
    mut error: Signal<Option<String>>,
) -> Element {
    let ThemeCtx(mut dark_mode) = use_context::<ThemeCtx>();
    let dark = *dark_mode.read();

    let file_name = upload
        .read()
        .as_ref()
        .map(|u| u.file_name.clone())
        .unwrap_or_default();

    rsx! {
        header { style: "{header_style(dark)}",
            h1 { style: "{title_style()}", "streamgraph" }

            div { style: "display: flex; align-items: center; gap: 0.75rem;",
                span { style: "{muted_style()}", "{file_name}" }
                input {
                    r#type: "file",
                    accept: ".csv",
                    multiple: false,
                    style: "{control_style(dark)}",
                    onchange: move |evt: FormEvent| {
                        let config = config.clone();
                        async move {
                            let Some(file_engine) = evt.files() else {
                                return;
                            };
                            // only the first selected file is used
                            let Some(name) = file_engine.files().into_iter().next() else {
                                return;
                            };
                            match file_engine.read_file_to_string(&name).await {
                                Some(text) => load_chart(&name, &text, &config, upload, error),
                                None => {
                                    warn!("Failed to read '{}', keeping the current chart", name);
                                    error.set(Some(format!("Could not read '{}'", name)));
                                }
                            }
                        }
                    }
                }
                button {
                    style: "{control_style(dark)}",
                    onclick: move |_| {
                        let current = *dark_mode.read();
                        dark_mode.set(!current);
                    },
                    if dark { "☀ light" } else { "☾ dark" }
                }
            }
        }
    }
}

/// Build a chart from uploaded text and replace the current one.
/// On failure the current chart stays and the error banner is set.
fn load_chart(
    name: &str,
    text: &str,
    config: &ChartConfig,
    mut upload: Signal<Option<Upload>>,
    mut error: Signal<Option<String>>,
) {
    match Chart::from_csv(text, config) {
        Ok(chart) => {
            info!(
                "Loaded '{}': {} records, {} layers",
                name,
                chart.records.len(),
                chart.layers.len()
            );
            let generation = upload.peek().as_ref().map_or(0, |u| u.generation + 1);
            upload.set(Some(Upload {
                generation,
                file_name: name.to_string(),
                chart,
            }));
            error.set(None);
        }
        Err(e) => {
            warn!("Failed to parse '{}': {}", name, e);
            error.set(Some(format!("Could not parse '{}': {}", name, e)));
        }
    }
}

#[component]
fn ErrorBanner(message: String) -> Element {
    let ThemeCtx(dark_mode) = use_context::<ThemeCtx>();
    let dark = *dark_mode.read();

    rsx! {
        div { style: "{error_style(dark)}",
            strong { "Error: " }
            "{message}"
        }
    }
}

#[component]
fn EmptyState() -> Element {
    let ThemeCtx(dark_mode) = use_context::<ThemeCtx>();
    let dark = *dark_mode.read();

    rsx! {
        div { style: "{empty_style()}",
            p { "Choose a CSV file to draw its streamgraph." }
            code { style: "{code_style(dark)}", "Date,LLaMA-3.1,Claude,PaLM-2,Gemini,GPT-4" }
        }
    }
}

#[component]
fn Legend(scene: Scene) -> Element {
    rsx! {
        div { style: "{legend_style()}",
            for entry in scene.legend.iter() {
                span { key: "{entry.key}",
                    span { style: "{legend_swatch_style(&entry.color)}" }
                    "{entry.key}"
                }
            }
        }
    }
}

/// Main plot with per-layer hover handling and the floating tooltip
#[component]
fn StreamChart(chart: Chart, config: ChartConfig) -> Element {
    let ThemeCtx(dark_mode) = use_context::<ThemeCtx>();
    let dark = *dark_mode.read();

    let mut hover = use_signal(HoverState::new);
    // Client-space origin of the plot container, refreshed on mount and on enter
    let mut container = use_signal(|| None::<Rc<MountedData>>);
    let mut origin = use_signal(|| (0.0f64, 0.0f64));

    let refresh_origin = move || {
        if let Some(element) = container.peek().clone() {
            spawn(async move {
                if let Ok(rect) = element.get_client_rect().await {
                    origin.set((rect.min_x(), rect.min_y()));
                }
            });
        }
    };

    let pointer_at = move |evt: &MouseEvent| {
        let client = evt.client_coordinates();
        let (ox, oy) = *origin.peek();
        Pointer {
            x: client.x - ox,
            y: client.y - oy,
        }
    };

    let scene = &chart.scene;
    let hovered = hover.read().hovered_layer();
    let tip = chart.tooltip(&hover.read(), &config);
    let axis_c = axis_color(dark);

    rsx! {
        div { style: "{chart_card_style(dark)}",
            div {
                style: "position: relative;",
                onmounted: move |evt| {
                    container.set(Some(evt.data()));
                    refresh_origin();
                },

                svg {
                    width: "{scene.width}",
                    height: "{scene.height}",
                    view_box: "0 0 {scene.width} {scene.height}",

                    g { transform: "translate({scene.margin.left},{scene.margin.top})",
                        for (index, layer) in scene.layers.iter().enumerate() {
                            path {
                                key: "{layer.key}",
                                d: "{layer.path}",
                                fill: "{layer.color}",
                                opacity: "{layer_opacity(hovered, index)}",
                                onmouseenter: move |evt| {
                                    refresh_origin();
                                    let pointer = pointer_at(&evt);
                                    hover.write().handle(PointerEvent::Enter { layer: index, pointer });
                                },
                                onmousemove: move |evt| {
                                    let pointer = pointer_at(&evt);
                                    hover.write().handle(PointerEvent::Move { layer: index, pointer });
                                },
                                onmouseleave: move |_| {
                                    hover.write().handle(PointerEvent::Leave { layer: index });
                                }
                            }
                        }

                        AxisView { axis: scene.x_axis.clone(), color: axis_c }
                        AxisView { axis: scene.y_axis.clone(), color: axis_c }
                    }
                }

                if let Some(tip) = tip {
                    TooltipView {
                        tooltip: tip,
                        padding: config.tooltip.padding,
                        header_height: config.tooltip.header_height,
                    }
                }
            }
        }
    }
}

#[component]
fn TooltipView(tooltip: Tooltip, padding: f64, header_height: f64) -> Element {
    let ThemeCtx(dark_mode) = use_context::<ThemeCtx>();
    let dark = *dark_mode.read();

    let readout = tooltip
        .readout
        .as_ref()
        .map(|r| format!("{}: {}", r.date.format("%b %-d, %Y"), format_value(r.value)));

    rsx! {
        div { style: "{tooltip_style(dark, tooltip.left, tooltip.top, padding)}",
            div { style: "{tooltip_header_style(header_height)}",
                div { style: "{tooltip_title_style()}", "{tooltip.key}" }
                if let Some(readout) = readout {
                    div { style: "{muted_style()}", "{readout}" }
                }
            }
            MiniChartView { chart: tooltip.chart.clone() }
        }
    }
}

/// Per-series bar chart shown inside the tooltip
#[component]
fn MiniChartView(chart: MiniChart) -> Element {
    let ThemeCtx(dark_mode) = use_context::<ThemeCtx>();
    let axis_c = axis_color(*dark_mode.read());

    rsx! {
        svg {
            width: "{chart.width}",
            height: "{chart.height}",
            g { transform: "translate({chart.margin.left},{chart.margin.top})",
                for (i, bar) in chart.bars.iter().enumerate() {
                    rect {
                        key: "{i}",
                        x: "{bar.x}",
                        y: "{bar.y}",
                        width: "{bar.width}",
                        height: "{bar.height}",
                        fill: "{chart.color}"
                    }
                }
                AxisView { axis: chart.x_axis.clone(), color: axis_c }
                AxisView { axis: chart.y_axis.clone(), color: axis_c }
            }
        }
    }
}

/// Domain line, tick marks and labels for one axis
#[component]
fn AxisView(axis: Axis, color: &'static str) -> Element {
    let (r0, r1) = axis.range;
    let size = streamgraph_core::scene::TICK_SIZE;

    match axis.orient {
        AxisOrient::Bottom => rsx! {
            g {
                transform: "translate(0,{axis.offset})",
                fill: "none",
                "font-size": "10",
                "text-anchor": "middle",
                path { stroke: "{color}", d: "M{r0},{size}V0H{r1}V{size}" }
                for (i, tick) in axis.ticks.iter().enumerate() {
                    g { key: "{i}", transform: "translate({tick.position},0)",
                        line { stroke: "{color}", y2: "{size}" }
                        text { fill: "{color}", y: "9", dy: "0.71em", "{tick.label}" }
                    }
                }
            }
        },
        AxisOrient::Left => rsx! {
            g {
                transform: "translate({axis.offset},0)",
                fill: "none",
                "font-size": "10",
                "text-anchor": "end",
                path { stroke: "{color}", d: "M-{size},{r0}H0V{r1}H-{size}" }
                for (i, tick) in axis.ticks.iter().enumerate() {
                    g { key: "{i}", transform: "translate(0,{tick.position})",
                        line { stroke: "{color}", x2: "-{size}" }
                        text { fill: "{color}", x: "-9", dy: "0.32em", "{tick.label}" }
                    }
                }
            }
        },
    }
}

fn format_value(value: f64) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }
    format!("{:.2}", value)
}
