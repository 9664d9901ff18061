//! Fixture-directory conformance runner.
//!
//! Every case is a directory holding `actual.js`, an optional
//! `options.json` and either `expected.json` or a `throws` entry in the
//! options. Expected trees are compared as a structural subset of the
//! serialized parse: every key present in the expectation must match, and
//! arrays must match element for element.

use std::fs;
use std::path::{Path, PathBuf};

use esfront_parser::{parse, ParseOptions};
use serde::Deserialize;
use serde_json::Value;

/// `options.json`: parse options plus the expected error message.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FixtureOptions {
    #[serde(flatten)]
    options: ParseOptions,
    throws: Option<String>,
}

/// A fixture case on disk.
#[derive(Debug, Clone)]
pub struct FixtureCase {
    pub name: String,
    pub category: String,
    pub dir: PathBuf,
}

/// Outcome of one case.
#[derive(Debug, Clone)]
pub struct CaseResult {
    pub name: String,
    pub category: String,
    pub passed: bool,
    pub failure: Option<String>,
}

/// Collect `<root>/<category>/<case>/` directories containing `actual.js`,
/// sorted by path.
pub fn discover(root: &Path) -> Vec<FixtureCase> {
    let mut cases = Vec::new();
    for category in sorted_dirs(root) {
        let category_name = file_name(&category);
        for dir in sorted_dirs(&category) {
            if dir.join("actual.js").is_file() {
                cases.push(FixtureCase { name: file_name(&dir), category: category_name.clone(), dir });
            }
        }
    }
    cases
}

fn sorted_dirs(path: &Path) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(path)
        .map(|entries| entries.filter_map(Result::ok).map(|e| e.path()).filter(|p| p.is_dir()).collect())
        .unwrap_or_default();
    dirs.sort();
    dirs
}

fn file_name(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}

/// Run one case.
pub fn run_case(case: &FixtureCase) -> CaseResult {
    let failure = check_case(case).err();
    CaseResult { name: case.name.clone(), category: case.category.clone(), passed: failure.is_none(), failure }
}

fn check_case(case: &FixtureCase) -> Result<(), String> {
    let source = read(&case.dir.join("actual.js"))?;
    let options_path = case.dir.join("options.json");
    let fixture_options: FixtureOptions = if options_path.is_file() {
        serde_json::from_str(&read(&options_path)?).map_err(|e| format!("options.json: {}", e))?
    } else {
        FixtureOptions::default()
    };

    let result = parse(&source, &fixture_options.options);
    match (fixture_options.throws, result) {
        (Some(expected), Err(err)) => {
            if err.to_string() == expected {
                Ok(())
            } else {
                Err(format!("expected error {:?}, got {:?}", expected, err.to_string()))
            }
        }
        (Some(expected), Ok(_)) => Err(format!("expected error {:?}, but parsing succeeded", expected)),
        (None, Err(err)) => Err(format!("unexpected error: {}", err)),
        (None, Ok(file)) => {
            let expected: Value = serde_json::from_str(&read(&case.dir.join("expected.json"))?)
                .map_err(|e| format!("expected.json: {}", e))?;
            let actual = serde_json::to_value(&file).map_err(|e| format!("serializing: {}", e))?;
            match subset_mismatch(&expected, &actual, "$") {
                Some(mismatch) => Err(mismatch),
                None => Ok(()),
            }
        }
    }
}

fn read(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))
}

/// The first place where `actual` does not contain `expected`, as a
/// JSON-path-like description.
pub fn subset_mismatch(expected: &Value, actual: &Value, path: &str) -> Option<String> {
    match (expected, actual) {
        (Value::Object(expected), Value::Object(actual)) => expected.iter().find_map(|(key, value)| {
            let child = format!("{}.{}", path, key);
            match actual.get(key) {
                Some(actual_value) => subset_mismatch(value, actual_value, &child),
                None if value.is_null() => None,
                None => Some(format!("{}: missing", child)),
            }
        }),
        (Value::Array(expected), Value::Array(actual)) => {
            if expected.len() != actual.len() {
                return Some(format!("{}: expected {} elements, got {}", path, expected.len(), actual.len()));
            }
            expected
                .iter()
                .zip(actual)
                .enumerate()
                .find_map(|(i, (e, a))| subset_mismatch(e, a, &format!("{}[{}]", path, i)))
        }
        (Value::Number(e), Value::Number(a)) if e.as_f64() == a.as_f64() => None,
        _ if expected == actual => None,
        _ => Some(format!("{}: expected {}, got {}", path, expected, actual)),
    }
}

/// Results of a whole fixture tree.
pub struct FixtureSuite {
    pub results: Vec<CaseResult>,
}

impl FixtureSuite {
    pub fn run(root: &Path) -> Self {
        Self { results: discover(root).iter().map(run_case).collect() }
    }

    pub fn failures(&self) -> Vec<&CaseResult> {
        self.results.iter().filter(|r| !r.passed).collect()
    }

    pub fn print_summary(&self) {
        let total = self.results.len();
        let passed = total - self.failures().len();
        println!("\n=== Fixture Summary ===");
        println!("Passed: {}/{}", passed, total);

        let mut categories: Vec<&str> = self.results.iter().map(|r| r.category.as_str()).collect();
        categories.dedup();
        for category in categories {
            let in_category: Vec<_> = self.results.iter().filter(|r| r.category == category).collect();
            let ok = in_category.iter().filter(|r| r.passed).count();
            println!("  {}: {}/{}", category, ok, in_category.len());
        }

        for failure in self.failures() {
            println!("  FAIL [{}] {}: {}", failure.category, failure.name, failure.failure.as_deref().unwrap_or(""));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_subset_ignores_extra_keys() {
        let expected = json!({ "type": "Identifier", "name": "a" });
        let actual = json!({ "type": "Identifier", "name": "a", "start": 0, "end": 1 });
        assert_eq!(subset_mismatch(&expected, &actual, "$"), None);
    }

    #[test]
    fn test_subset_reports_path() {
        let expected = json!({ "body": [{ "name": "a" }, { "name": "b" }] });
        let actual = json!({ "body": [{ "name": "a" }, { "name": "c" }] });
        assert_eq!(subset_mismatch(&expected, &actual, "$"), Some("$.body[1].name: expected \"b\", got \"c\"".to_string()));
    }

    #[test]
    fn test_subset_array_length() {
        let expected = json!([1, 2]);
        let actual = json!([1]);
        assert!(subset_mismatch(&expected, &actual, "$").unwrap().contains("expected 2 elements"));
    }

    #[test]
    fn test_subset_numbers_compare_by_value() {
        assert_eq!(subset_mismatch(&json!(1), &json!(1.0), "$"), None);
    }

    #[test]
    fn test_null_matches_missing_key() {
        assert_eq!(subset_mismatch(&json!({ "alternate": null }), &json!({}), "$"), None);
    }
}
