//! HTML fragment rendering for the browser UI

use std::fmt::Write;

use super::urls::extract_urls;
use crate::catalog::record::IMAGE_COLUMN;
use crate::catalog::PlantRecord;

const CARD_CLASS: &str = "mb-4 p-4 bg-white rounded shadow";
const SIMILARITY_CLASS: &str = "bg-green-100 text-green-800 text-sm font-semibold px-2.5 py-0.5 rounded";

/// Display label and dataset column for each field shown on a plant card
pub const FIELD_LABELS: &[(&str, &str)] = &[
  ("Common Names", "COMMON NAMES"),
  ("Family", "Family"),
  ("Origin", "ORIGIN"),
  ("Edible Parts", "EDIBLE PARTS"),
  ("Type of Plant", "TYPE OF PLANTS"),
  ("Foliage", "FOLIAGE"),
  ("Max Height", "MAX. HEIGHT"),
  ("Environmental Attributes", "ENVIRONMENTAL ATTRIBUTES"),
  ("Ideal Soil", "IDEAL SOIL"),
  ("Ideal Sun Exposure", "IDEAL SUN EXPOSURE"),
  ("Water Preferences", "WATER PREFERENCES"),
  ("Pollination", "POLLINATION"),
];

/// Static page served at the root route
pub fn render_welcome() -> String {
  "<h2>Hi, this is a web UI for the orchards of flavour data.</h2>".to_string()
}

/// Card for a single plant
pub fn render_plant(record: &PlantRecord) -> String {
  let mut html = String::new();
  let _ = writeln!(html, "<div class=\"{CARD_CLASS}\">");

  let _ = write!(html, "  <h1>{}", escape_html(record.latin_name()));
  if let Some(similarity) = record.similarity {
    let _ = write!(html, " <span class=\"{SIMILARITY_CLASS}\">similarity: {similarity:.2}</span>");
  }
  let _ = writeln!(html, "</h1>");

  for (label, column) in FIELD_LABELS {
    let _ = writeln!(html, "  <p><strong>{label}:</strong> {}</p>", escape_html(record.field(column)));
  }

  let images = extract_urls(record.field(IMAGE_COLUMN));
  if !images.is_empty() {
    let _ = writeln!(html, "  <p><strong>Plant Images:</strong></p>");
    let _ = writeln!(html, "  <div class=\"flex space-x-4\">");
    for url in &images {
      let _ = writeln!(
        html,
        "    <img src=\"{}\" alt=\"Plant Image\" class=\"rounded shadow\" style=\"width: 300px;\">",
        escape_html(url)
      );
    }
    let _ = writeln!(html, "  </div>");
  }

  html.push_str("</div>\n");
  html
}

/// Summary line followed by one card per plant, in the given order
pub fn render_search(query: &str, records: &[PlantRecord]) -> String {
  let mut html = String::new();
  let _ = writeln!(html, "<div class=\"{CARD_CLASS}\">");
  let _ = writeln!(html, "  <h1>Plants matching '{}'</h1>", escape_html(query));
  let _ = writeln!(html, "  <p>Found {} plant(s).</p>", records.len());
  let _ = writeln!(html, "</div>");

  html.push_str("<div class=\"container\">\n");
  for record in records {
    html.push_str(&render_plant(record));
  }
  html.push_str("</div>\n");
  html
}

/// Fragment shown when a search matched nothing
pub fn render_no_results(query: &str) -> String {
  format!(
    "<div class=\"{CARD_CLASS}\">\n  <h1>No plants found matching the requested query</h1>\n  \
     <p>Nothing matched '{}'. Try a different search term.</p>\n</div>\n",
    escape_html(query)
  )
}

/// Fragment shown when an id lookup found nothing
pub fn render_plant_not_found(id: i64) -> String {
  format!("<div class=\"{CARD_CLASS}\">\n  <h1>Plant not found</h1>\n  <p>No plant has id {id}.</p>\n</div>\n")
}

pub fn escape_html(text: &str) -> String {
  let mut escaped = String::with_capacity(text.len());
  for c in text.chars() {
    match c {
      '&' => escaped.push_str("&amp;"),
      '<' => escaped.push_str("&lt;"),
      '>' => escaped.push_str("&gt;"),
      '"' => escaped.push_str("&quot;"),
      '\'' => escaped.push_str("&#39;"),
      _ => escaped.push(c),
    }
  }
  escaped
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_escape_html() {
    assert_eq!(escape_html("<b>\"Tom\" & 'Jerry'</b>"), "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;");
    assert_eq!(escape_html("plain"), "plain");
  }
}
