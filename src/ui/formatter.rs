//! Pure formatting functions for UI output.
//!
//! Everything styled goes through `console::style`, which drops the colors
//! when the stream is not a terminal.

use console::style;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("error:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Format and print a hint after a usage error.
pub fn display_hint(message: &str) {
    eprintln!("{}", style(message).dim());
}

/// JSON error payload, e.g. `{"error":"...","type":"runtime","code":1}`
pub fn json_error(message: &str, kind: &str, code: i32) -> String {
    serde_json::json!({
        "error": message,
        "type": kind,
        "code": code,
    })
    .to_string()
}

/// Banner shown above help output.
///
/// # Arguments
/// * `version` - Version shown on the banner
/// * `last_codename` - Codename of the newest release, if any
pub fn render_banner(version: &str, last_codename: Option<&str>) -> String {
    let lines = [
        "╔════════════════════════════════════════════╗".to_string(),
        "║                  TAGtastic                 ║".to_string(),
        "║        Release codenames for CI/CD         ║".to_string(),
        "║          Powered by InfraVillage™          ║".to_string(),
        "╚════════════════════════════════════════════╝".to_string(),
        format!("version: {}", version),
        format!(
            "last release codename: {}",
            last_codename
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or("none")
        ),
    ];
    lines.join("\n")
}
