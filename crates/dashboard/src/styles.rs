//! Inline styles - no external CSS files
//!
//! Light/dark theme aware. Layer colors come from the series catalog,
//! everything else from here.

// ============================================================================
// Page chrome
// ============================================================================

/// Generate app style based on theme
pub fn app_style(dark: bool) -> String {
    let (bg, fg) = if dark {
        ("#0d1117", "#c9d1d9")
    } else {
        ("#ffffff", "#1a1a1a")
    };
    format!(
        "min-height: 100vh; \
         display: flex; \
         flex-direction: column; \
         font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif; \
         font-size: 14px; \
         background: {bg}; \
         color: {fg}; \
         line-height: 1.5; \
         margin: 0; \
         padding: 0;"
    )
}

pub fn header_style(dark: bool) -> String {
    let (bg, border) = if dark {
        ("#161b22", "#30363d")
    } else {
        ("#f6f8fa", "#d0d7de")
    };
    format!(
        "display: flex; \
         justify-content: space-between; \
         align-items: center; \
         gap: 1rem; \
         padding: 0.75rem 1rem; \
         background: {bg}; \
         border-bottom: 1px solid {border};"
    )
}

pub fn title_style() -> &'static str {
    "font-size: 1.1rem; \
     font-weight: 600; \
     margin: 0;"
}

/// Theme toggle and file picker share one button look
pub fn control_style(dark: bool) -> String {
    let (bg, fg, border) = if dark {
        ("#21262d", "#c9d1d9", "#30363d")
    } else {
        ("#f6f8fa", "#1a1a1a", "#d0d7de")
    };
    format!(
        "background: {bg}; \
         color: {fg}; \
         border: 1px solid {border}; \
         padding: 0.35rem 0.75rem; \
         font-family: inherit; \
         font-size: 0.8rem; \
         border-radius: 6px; \
         cursor: pointer;"
    )
}

pub fn main_content_style() -> &'static str {
    "flex: 1; \
     padding: 1rem; \
     display: flex; \
     flex-direction: column; \
     align-items: flex-start; \
     gap: 0.75rem;"
}

// ============================================================================
// Chart
// ============================================================================

pub fn chart_card_style(dark: bool) -> String {
    let (bg, border) = if dark {
        ("#161b22", "#30363d")
    } else {
        ("#ffffff", "#d0d7de")
    };
    format!(
        "position: relative; \
         background: {bg}; \
         border: 1px solid {border}; \
         border-radius: 8px; \
         line-height: 0;"
    )
}

pub fn legend_style() -> &'static str {
    "display: flex; \
     flex-wrap: wrap; \
     gap: 0.75rem; \
     font-size: 0.8rem;"
}

pub fn legend_swatch_style(color: &str) -> String {
    format!(
        "display: inline-block; \
         width: 12px; \
         height: 12px; \
         margin-right: 0.3rem; \
         vertical-align: middle; \
         background: {color};"
    )
}

/// Layer paths dim slightly unless hovered
pub fn layer_opacity(hovered: Option<usize>, index: usize) -> &'static str {
    match hovered {
        Some(h) if h != index => "0.7",
        _ => "1",
    }
}

/// SVG axis stroke and label color
pub fn axis_color(dark: bool) -> &'static str {
    if dark { "#8b949e" } else { "#57606a" }
}

// ============================================================================
// Tooltip
// ============================================================================

/// Floating tooltip box; `left`/`top` are already clamped to the chart
pub fn tooltip_style(dark: bool, left: f64, top: f64, padding: f64) -> String {
    let (bg, border) = if dark {
        ("rgba(22, 27, 34, 0.95)", "#30363d")
    } else {
        ("rgba(255, 255, 255, 0.95)", "#d0d7de")
    };
    format!(
        "position: absolute; \
         left: {left}px; \
         top: {top}px; \
         background: {bg}; \
         border: 1px solid {border}; \
         border-radius: 4px; \
         padding: {padding}px; \
         font-size: 0.8rem; \
         line-height: 1.4; \
         z-index: 100; \
         box-shadow: 0 4px 12px rgba(0,0,0,0.3); \
         pointer-events: none;"
    )
}

/// Fixed band for the title and readout so the box height is known up front
pub fn tooltip_header_style(height: f64) -> String {
    format!(
        "height: {height}px; \
         overflow: hidden; \
         white-space: nowrap;"
    )
}

pub fn tooltip_title_style() -> &'static str {
    "font-weight: 600; \
     margin-bottom: 0.2rem;"
}

pub fn muted_style() -> &'static str {
    "color: #6e7681;"
}

// ============================================================================
// States
// ============================================================================

pub fn error_style(dark: bool) -> String {
    let border = if dark { "#f85149" } else { "#cf222e" };
    format!(
        "padding: 0.6rem 1rem; \
         border: 1px solid {border}; \
         border-radius: 8px;"
    )
}

pub fn empty_style() -> &'static str {
    "padding: 2rem; \
     text-align: center; \
     opacity: 0.7;"
}

pub fn code_style(dark: bool) -> String {
    let (bg, fg) = if dark {
        ("#21262d", "#79c0ff")
    } else {
        ("#f6f8fa", "#0550ae")
    };
    format!(
        "background: {bg}; \
         color: {fg}; \
         padding: 0.2rem 0.5rem; \
         border-radius: 4px; \
         font-size: 0.85rem; \
         font-family: 'SF Mono', 'Fira Code', monospace;"
    )
}
