//! Minimal `{{ key }}` substitution used by the app shell and instruction
//! page templates.

use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;

use crate::error::RenderError;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
	Literal(String),
	Placeholder(String),
}

/// A substitution template parsed and validated against the keys it may
/// reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
	path: PathBuf,
	segments: Vec<Segment>,
}

impl Template {
	/// Parse `source`. Every placeholder must name one of `keys`; `path` is
	/// only used in error messages.
	pub fn parse(path: &Path, source: &str, keys: &[&str]) -> Result<Self, RenderError> {
		let mut segments = Vec::new();
		let mut rest = source;
		let mut offset = 0;

		while let Some(start) = rest.find(OPEN) {
			if start > 0 {
				segments.push(Segment::Literal(rest[..start].to_owned()));
			}

			let after_open = &rest[start + OPEN.len()..];
			let Some(end) = after_open.find(CLOSE) else {
				return Err(template_error(
					path,
					source,
					offset + start,
					"unterminated placeholder".to_owned(),
				));
			};

			let key = after_open[..end].trim();
			if !keys.iter().any(|known| *known == key) {
				return Err(template_error(
					path,
					source,
					offset + start,
					format!("unknown placeholder `{key}`"),
				));
			}
			segments.push(Segment::Placeholder(key.to_owned()));

			let consumed = start + OPEN.len() + end + CLOSE.len();
			rest = &rest[consumed..];
			offset += consumed;
		}

		if !rest.is_empty() {
			segments.push(Segment::Literal(rest.to_owned()));
		}

		Ok(Self {
			path: path.to_path_buf(),
			segments,
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Substitute `context` values. Substituted text is never re-scanned for
	/// placeholders.
	pub fn render(&self, context: &Context) -> String {
		let mut output = String::new();
		for segment in &self.segments {
			match segment {
				Segment::Literal(text) => output.push_str(text),
				Segment::Placeholder(key) => output.push_str(context.get(key)),
			}
		}
		output
	}
}

/// Values available to a template render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
	values: HashMap<&'static str, String>,
}

impl Context {
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
		self.insert(key, value);
		self
	}

	pub fn insert(&mut self, key: &'static str, value: impl Into<String>) {
		self.values.insert(key, value.into());
	}

	/// Missing keys render as the empty string.
	pub fn get(&self, key: &str) -> &str {
		self.values.get(key).map_or("", String::as_str)
	}
}

fn template_error(path: &Path, source: &str, position: usize, message: String) -> RenderError {
	let line = source[..position].matches('\n').count() + 1;
	RenderError::Template {
		path: path.to_path_buf(),
		line,
		message,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn parse(source: &str) -> Result<Template, RenderError> {
		Template::parse(Path::new("test.tmpl"), source, &["programId", "name"])
	}

	#[test]
	fn substitutes_keys() {
		let template = parse("const ID = \"{{programId}}\"; // {{ name }}")
			.unwrap_or_else(|e| panic!("template should parse: {e}"));
		let context = Context::new().with("programId", "Prog111").with("name", "demo");
		insta::assert_snapshot!(template.render(&context), @r#"const ID = "Prog111"; // demo"#);
	}

	#[test]
	fn missing_values_render_empty() {
		let template = parse("[{{name}}]").unwrap_or_else(|e| panic!("template should parse: {e}"));
		assert_eq!(template.render(&Context::new()), "[]");
	}

	#[test]
	fn does_not_rescan_substituted_text() {
		let template = parse("{{name}}").unwrap_or_else(|e| panic!("template should parse: {e}"));
		let context = Context::new().with("name", "{{programId}}");
		assert_eq!(template.render(&context), "{{programId}}");
	}

	#[test]
	fn rejects_unknown_placeholder_with_line() {
		let result = parse("first\nsecond {{ nope }}");
		assert!(matches!(
			result,
			Err(RenderError::Template { line: 2, ref message, .. }) if message.contains("nope")
		));
	}

	#[test]
	fn rejects_unterminated_placeholder() {
		let result = parse("{{programId");
		assert!(matches!(result, Err(RenderError::Template { line: 1, .. })));
	}

	#[test]
	fn keeps_single_braces() {
		let template = parse("export default function App() { return null; }")
			.unwrap_or_else(|e| panic!("template should parse: {e}"));
		assert_eq!(
			template.render(&Context::new()),
			"export default function App() { return null; }"
		);
	}
}
