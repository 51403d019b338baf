//! Writes the page that boots the streamgraph dashboard
//!
//! Usage: generate_html [OUT_DIR]   (defaults to `dist`)
//!
//! The page only hosts the wasm bundle; everything else is drawn by the app.

use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Module name wasm-bindgen emits for this crate
const BUNDLE: &str = "streamgraph_dashboard";

/// Root element the app mounts into
const MOUNT_ID: &str = "main";

fn main() -> io::Result<()> {
    let out_dir = env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("dist"));
    fs::create_dir_all(&out_dir)?;

    let index = out_dir.join("index.html");
    fs::write(&index, shell_page("Streamgraph", BUNDLE))?;

    println!("Wrote {}", index.display());
    Ok(())
}

/// HTML that loads `<bundle>.js` and removes the placeholder once it starts
fn shell_page(title: &str, bundle: &str) -> String {
    let mut page = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    page.push_str("  <meta charset=\"utf-8\">\n");
    page.push_str("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    page.push_str(&format!("  <title>{title}</title>\n"));
    page.push_str(&format!("  <link rel=\"modulepreload\" href=\"./{bundle}.js\">\n"));
    page.push_str(&format!("  <style>\n{PAGE_CSS}  </style>\n"));
    page.push_str("</head>\n<body>\n");
    page.push_str("  <noscript>This chart needs JavaScript and WebAssembly.</noscript>\n");
    page.push_str("  <p id=\"placeholder\">Starting streamgraph...</p>\n");
    page.push_str(&format!("  <div id=\"{MOUNT_ID}\"></div>\n"));
    page.push_str("  <script type=\"module\">\n");
    page.push_str(&format!("    import start from './{bundle}.js';\n"));
    page.push_str("    start().finally(() => document.getElementById('placeholder')?.remove());\n");
    page.push_str("  </script>\n</body>\n</html>\n");
    page
}

const PAGE_CSS: &str = "    *, *::before, *::after { box-sizing: border-box; }
    body { margin: 0; font: 13px/1.4 system-ui, sans-serif; }
    #placeholder, noscript { display: block; margin: 3rem auto; text-align: center; color: #6e7681; }
    #main { min-height: 100vh; }
    svg text { font: 10px sans-serif; }
";
