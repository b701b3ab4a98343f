//! HTML and text helpers shared by the extractors.
//!
//! This module provides the small generic pieces every scraper needs:
//! - Regex search that fails loudly when a required value is missing
//! - Comment stripping and markup-to-text cleanup
//! - DOM lookups by element id and `<meta>` name
//! - String truncation and slugification for logging and file names

use crate::error::{ExtractorError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

static HTML_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s*<br\s*/?>\s*").unwrap());
static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*</p>\s*<p[^>]*>\s*").unwrap());

/// Return the first capture group of `re` in `text`.
///
/// # Errors
///
/// Returns [`ExtractorError::NotFound`] naming `what` if the pattern does
/// not match.
pub fn search_regex<'t>(re: &Regex, text: &'t str, what: &str) -> Result<&'t str> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| ExtractorError::not_found(what))
}

/// Remove every `<!-- ... -->` block, including ones spanning lines.
pub fn strip_html_comments(html: &str) -> String {
    HTML_COMMENT.replace_all(html, "").into_owned()
}

fn select_by_id<'a>(document: &'a Html, id: &str) -> Option<scraper::ElementRef<'a>> {
    let selector = Selector::parse(&format!("[id=\"{id}\"]")).ok()?;
    document.select(&selector).next()
}

/// Inner HTML of the first element whose `id` attribute equals `id`.
pub fn get_element_by_id(id: &str, html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    select_by_id(&document, id).map(|element| element.inner_html())
}

/// Decoded text content of the first element whose `id` equals `id`, trimmed.
pub fn get_element_text_by_id(id: &str, html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    select_by_id(&document, id)
        .map(|element| element.text().collect::<String>().trim().to_string())
}

/// Strip markup from an HTML fragment, keeping `<br>` and paragraph
/// boundaries as newlines and decoding entities.
///
/// # Examples
///
/// ```
/// use mit_video::utils::clean_html;
/// assert_eq!(clean_html("<p>One</p><p>Two &amp; three</p>"), "One\nTwo & three");
/// ```
pub fn clean_html(html: &str) -> String {
    let flat = html.replace('\n', " ");
    let flat = LINE_BREAK.replace_all(&flat, "\n");
    let flat = PARAGRAPH_BREAK.replace_all(&flat, "\n");
    let fragment = Html::parse_fragment(&flat);
    fragment
        .root_element()
        .text()
        .collect::<String>()
        .trim()
        .to_string()
}

/// `content` of the first `<meta>` tag whose `name`, `property` or
/// `itemprop` equals `name`.
pub fn html_search_meta(name: &str, html: &str) -> Option<String> {
    let selector = Selector::parse(&format!(
        "meta[name=\"{name}\"], meta[property=\"{name}\"], meta[itemprop=\"{name}\"]"
    ))
    .ok()?;
    let document = Html::parse_document(html);
    document
        .select(&selector)
        .find_map(|element| element.value().attr("content"))
        .map(|content| content.trim().to_string())
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut at `max` bytes (backing off to a char boundary) with
/// an ellipsis and byte count indicator appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

/// Convert a title or URL into a file-name friendly slug.
///
/// Lowercases the text, removes special characters, and replaces spaces
/// with hyphens.
pub fn slugify_title(title: &str) -> String {
    title
        .to_lowercase()
        .replace(|c: char| !c.is_alphanumeric() && c != ' ' && c != '-', "")
        .replace(' ', "-")
}
