use serde_json::Value;

/// Extract documentation lines from a descriptor `docs` field.
///
/// Accepts either an array of strings or a single (possibly multi-line)
/// string. Each line is trimmed; non-string entries are ignored.
pub fn extract_docs(value: Option<&Value>) -> Vec<String> {
	match value {
		Some(Value::Array(lines)) => {
			lines
				.iter()
				.filter_map(Value::as_str)
				.map(|line| line.trim().to_owned())
				.collect()
		}
		Some(Value::String(text)) => text.lines().map(|line| line.trim().to_owned()).collect(),
		_ => Vec::new(),
	}
}
