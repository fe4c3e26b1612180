use once_cell::sync::Lazy;
use regex::Regex;

static URL_PATTERN: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"https?://[^\s,]+").expect("URL pattern is a valid regex"));

/// All http(s) URLs embedded in free text, in order of appearance
pub fn extract_urls(text: &str) -> Vec<String> {
  URL_PATTERN.find_iter(text).map(|m| m.as_str().to_string()).collect()
}
