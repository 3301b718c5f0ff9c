use std::fs;

use toml::{Table, Value};

const DEFAULT_CONFIG: &str = "src/default_config.toml";

/// Keys the bundled conversion config must carry, with a type check each.
const REQUIRED_KEYS: &[(&str, &str, fn(&Value) -> bool)] = &[
    ("headings", "legacy_syntax", Value::is_bool),
    ("links", "pipe_syntax", Value::is_bool),
    ("code", "languages", Value::is_array),
];

fn main() {
    println!("cargo:rerun-if-changed={}", DEFAULT_CONFIG);

    let content = fs::read_to_string(DEFAULT_CONFIG)
        .unwrap_or_else(|e| panic!("cannot read {}: {}", DEFAULT_CONFIG, e));
    let table: Table = content
        .parse()
        .unwrap_or_else(|e| panic!("{} is not valid TOML: {}", DEFAULT_CONFIG, e));

    for (section, key, has_type) in REQUIRED_KEYS {
        let value = table
            .get(*section)
            .and_then(Value::as_table)
            .and_then(|section| section.get(*key));
        match value {
            Some(value) if has_type(value) => {}
            Some(value) => panic!(
                "{}: [{}] {} has unexpected type {}",
                DEFAULT_CONFIG,
                section,
                key,
                value.type_str()
            ),
            None => panic!("{}: missing [{}] {}", DEFAULT_CONFIG, section, key),
        }
    }

    if let Some(Value::Array(languages)) = table.get("code").and_then(|code| code.get("languages")) {
        if !languages.iter().all(Value::is_str) {
            panic!("{}: [code] languages must be strings", DEFAULT_CONFIG);
        }
    }
}
