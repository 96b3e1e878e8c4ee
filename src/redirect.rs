//! Redirect page generation.
//!
//! Stage 4 of the build pipeline. The output root gets a synthesized
//! `index.html` that immediately sends the browser to the latest published
//! version via a meta-refresh, a static stand-in for a server-side redirect,
//! so the site works from any dumb file host.
//!
//! ```text
//! _build/site/
//! ├── index.html          # meta-refresh → ./v2.4.7/index.html
//! ├── main/
//! ├── v3.0.0/
//! └── v2.4.7/
//! ```
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating,
//! with a plain anchor as fallback for anything that ignores meta-refresh.

use maud::{DOCTYPE, Markup, html};
use std::path::{Path, PathBuf};

/// Relative URL of the latest version's entry page.
pub fn redirect_target(latest: &str) -> String {
    format!("./{latest}/index.html")
}

/// Render the redirect page for the given latest version.
pub fn render_redirect(latest: &str) -> Markup {
    let target = redirect_target(latest);
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta http-equiv="refresh" content=(format!("0; url={target}"));
                link rel="canonical" href=(target);
                title { "Redirecting to " (latest) }
            }
            body {
                p {
                    "Redirecting to "
                    a href=(target) { (latest) }
                    "…"
                }
            }
        }
    }
}

/// Write the redirect `index.html` into the output root.
///
/// Returns the path of the written file.
pub fn write_redirect(output_dir: &Path, latest: &str) -> std::io::Result<PathBuf> {
    let path = output_dir.join("index.html");
    std::fs::write(&path, render_redirect(latest).into_string())?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn target_points_into_the_latest_version() {
        assert_eq!(redirect_target("v2.4.7"), "./v2.4.7/index.html");
        assert_eq!(redirect_target("main"), "./main/index.html");
    }

    #[test]
    fn rendered_page_carries_the_meta_refresh() {
        let page = render_redirect("v2.4.7").into_string();
        assert!(page.contains(r#"http-equiv="refresh""#));
        assert!(page.contains("0; url=./v2.4.7/index.html"));
        // Fallback link for clients that ignore meta-refresh
        assert!(page.contains(r#"<a href="./v2.4.7/index.html">"#));
    }

    #[test]
    fn rendered_page_is_a_complete_document() {
        let page = render_redirect("v2.4.7").into_string();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains(r#"<html lang="en">"#));
    }

    #[test]
    fn write_redirect_creates_index_at_output_root() {
        let tmp = TempDir::new().unwrap();
        let path = write_redirect(tmp.path(), "v2.4.7").unwrap();
        assert_eq!(path, tmp.path().join("index.html"));
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("./v2.4.7/index.html"));
    }
}
