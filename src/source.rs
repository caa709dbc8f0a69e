//! Discovering and loading alert emails from disk

use crate::config::InputMode;
use crate::error::{Error, Result};
use mailparse::MailHeaderMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name suffix of saved alert emails
pub const EMAIL_EXTENSION: &str = ".eml";

/// One email ready for parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailSource {
    /// Identifier carried into every listing (the file path)
    pub id: String,

    /// Text lines, without line terminators
    pub lines: Vec<String>,
}

/// List the `.eml` files directly inside `dir`, sorted by file name.
///
/// The suffix check is case-sensitive. Anything else in the directory,
/// subdirectories included, is ignored.
pub fn discover(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let entries = std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();
        let is_email = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(EMAIL_EXTENSION));

        if is_email && path.is_file() {
            paths.push(path);
        } else {
            debug!("Ignoring {}", path.display());
        }
    }

    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

/// Read an email file into lines according to `mode`
pub fn load(path: impl AsRef<Path>, mode: InputMode) -> Result<EmailSource> {
    let path = path.as_ref();
    let raw = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    let id = path.display().to_string();

    let lines = match mode {
        InputMode::Raw => split_lines(&String::from_utf8_lossy(&raw)),
        InputMode::Mime => mime_lines(path, &raw)?,
    };

    debug!("Loaded {} lines from {id}", lines.len());
    Ok(EmailSource { id, lines })
}

fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

/// `Date:` and `Subject:` header lines followed by the decoded text body
fn mime_lines(path: &Path, raw: &[u8]) -> Result<Vec<String>> {
    let parsed = mailparse::parse_mail(raw).map_err(|e| Error::Mime {
        path: path.to_path_buf(),
        details: e.to_string(),
    })?;

    // Date must precede Subject whatever order the message stores them in
    let mut lines: Vec<String> = ["Date", "Subject"]
        .into_iter()
        .filter_map(|key| {
            parsed
                .headers
                .get_first_value(key)
                .map(|value| format!("{key}: {value}"))
        })
        .collect();

    let mut html = None;
    let body = match first_plain_body(&parsed, &mut html) {
        Some(text) => text,
        None => html.as_deref().map(strip_html).unwrap_or_default(),
    };

    lines.push(String::new());
    lines.extend(split_lines(&body));
    Ok(lines)
}

/// First text/plain leaf in part order, remembering the first HTML leaf on the way
fn first_plain_body(part: &mailparse::ParsedMail, html: &mut Option<String>) -> Option<String> {
    if !part.subparts.is_empty() {
        return part
            .subparts
            .iter()
            .find_map(|sub| first_plain_body(sub, html));
    }

    match part.ctype.mimetype.to_lowercase().as_str() {
        "text/plain" => part.get_body().ok(),
        "text/html" => {
            if html.is_none() {
                *html = part.get_body().ok();
            }
            None
        }
        _ => None,
    }
}

/// Reduce HTML to text, one line per block element.
///
/// `&pound;` is left encoded; the price matcher accepts it as is.
fn strip_html(html: &str) -> String {
    let mut result = String::new();
    let mut tag = String::new();
    let mut in_tag = false;
    let mut skipping = false;

    for c in html.chars() {
        match (in_tag, c) {
            (false, '<') => {
                in_tag = true;
                tag.clear();
            }
            (true, '>') => {
                in_tag = false;
                let name = tag.to_lowercase();
                if name.starts_with("script") || name.starts_with("style") {
                    skipping = true;
                } else if name.starts_with("/script") || name.starts_with("/style") {
                    skipping = false;
                } else if ["br", "/p", "/div", "/li", "/h", "/tr", "/td"]
                    .iter()
                    .any(|block| name.starts_with(block))
                {
                    result.push('\n');
                }
            }
            (true, _) => tag.push(c),
            (false, _) if !skipping => result.push(c),
            (false, _) => {}
        }
    }

    let result = result
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    result
        .lines()
        .filter(|l| !l.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
