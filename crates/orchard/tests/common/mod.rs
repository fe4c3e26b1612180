#![allow(dead_code)]

use orchard::catalog::{parse_dataset, RecordTable};

pub const HEADER: &str = "LATIN NAME,COMMON NAMES,Family,ORIGIN,ADULTTREE,EDIBLE PARTS,TYPE OF PLANTS,FOLIAGE,MAX. HEIGHT,ENVIRONMENTAL ATTRIBUTES,IDEAL SOIL,IDEAL SUN EXPOSURE,WATER PREFERENCES,POLLINATION,ID";

/// Small catalog with one mango, one avocado and one feijoa
pub fn sample_csv() -> String {
  [
    HEADER,
    r#"Mangifera indica,"Mango, Kensington Pride",Anacardiaceae,South Asia,"https://img.example/mango1.jpg, https://img.example/mango2.jpg",Fruit,Tree,Evergreen,30m,Drought tolerant,Well drained,Full sun,Moderate,Insects,1"#,
    r#"Persea americana,"Avocado, Hass",Lauraceae,Central America,,Fruit,Tree,Evergreen,20m,Frost tender,Loam,Full sun,Regular,Self-fertile,2"#,
    r#"Acca sellowiana,Feijoa,Myrtaceae,South America,no pictures yet,"Fruit, Flowers",Shrub,Evergreen,5m,Hardy,Any,Full sun,Low,Birds,3"#,
  ]
  .join("\n")
}

/// Catalog with ids 1..=count, each named "Plant <id>"
pub fn numbered_csv(count: i64) -> String {
  let mut lines = vec![HEADER.to_string()];
  for id in 1..=count {
    lines.push(format!("Plantus {id},Plant {id},Testaceae,Nowhere,,Leaves,Herb,Deciduous,1m,,,,,,{id}"));
  }
  lines.join("\n")
}

pub fn sample_table() -> RecordTable {
  parse_dataset(sample_csv().as_bytes()).expect("sample dataset parses")
}

pub fn numbered_table(count: i64) -> RecordTable {
  parse_dataset(numbered_csv(count).as_bytes()).expect("numbered dataset parses")
}
