// Response segmentation module
//
// Reasoning models wrap their deliberation in <think> tags and put the
// user-facing answer after the closing tag. The remote service does not
// guarantee well-formed output (missing closing tag, stray markers, no tags
// at all), so segmentation is deliberately lenient: it always produces an
// answer and never fails.

use regex::Regex;
use std::sync::OnceLock;

const THINK_OPEN: &str = "<think>";
const THINK_CLOSE: &str = "</think>";

static THINK_PATTERN: OnceLock<Regex> = OnceLock::new();

fn think_pattern() -> &'static Regex {
	// Non-greedy so repeated markers inside the reasoning stop at the first
	// closing tag; (?s) lets the tags span lines.
	THINK_PATTERN.get_or_init(|| {
		Regex::new(r"(?s)<think>(.*?)</think>(.*)").expect("think pattern is valid")
	})
}

/// Result of splitting one raw model response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
	/// Present only when a reasoning segment was unambiguously delimited.
	pub reasoning: Option<String>,
	/// Always present; falls back to the full raw string when no delimiters
	/// are found. Never contains the delimiter markers after a successful split.
	pub answer: String,
}

impl ParsedResponse {
	fn answer_only(raw: &str) -> Self {
		Self {
			reasoning: None,
			answer: raw.trim().to_string(),
		}
	}

	pub fn has_reasoning(&self) -> bool {
		self.reasoning
			.as_deref()
			.map(|r| !r.is_empty())
			.unwrap_or(false)
	}
}

/// Split a raw response into an optional reasoning segment and an answer.
///
/// Two-tier strategy: a structural non-greedy pattern match first, then a
/// literal-position fallback on the first open/close marker pair. Neither
/// tier matching means the whole (trimmed) input is the answer. Only one
/// split is ever produced; markers appearing after a real close stay in the
/// answer untouched.
pub fn parse_response(raw: &str) -> ParsedResponse {
	// Tier 1: structural pattern match, shortest reasoning segment wins
	if let Some(captures) = think_pattern().captures(raw) {
		let reasoning = captures.get(1).map_or("", |m| m.as_str()).trim();
		let answer = captures.get(2).map_or("", |m| m.as_str()).trim();
		return ParsedResponse {
			reasoning: Some(reasoning.to_string()),
			// An empty answer after a valid think block stays empty; the
			// reasoning is never promoted to answer.
			answer: answer.to_string(),
		};
	}

	// Tier 2: literal fallback, first close marker positionally after the
	// first open marker
	if let Some(open_idx) = raw.find(THINK_OPEN) {
		let after_open = open_idx + THINK_OPEN.len();
		if let Some(close_rel) = raw[after_open..].find(THINK_CLOSE) {
			let close_idx = after_open + close_rel;
			let reasoning = raw[after_open..close_idx].trim();
			let answer = raw[close_idx + THINK_CLOSE.len()..].trim();
			return ParsedResponse {
				reasoning: Some(reasoning.to_string()),
				answer: answer.to_string(),
			};
		}
	}

	// Tier 3: no usable delimiters (none present, close before open, or an
	// unterminated open) - the whole input is the answer
	ParsedResponse::answer_only(raw)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_well_formed_tags() {
		let parsed = parse_response("<think>step one</think>final answer");
		assert_eq!(parsed.reasoning.as_deref(), Some("step one"));
		assert_eq!(parsed.answer, "final answer");
	}

	#[test]
	fn test_multiline_reasoning() {
		let raw = "<think>line one\nline two\n</think>\n\nThe answer is 4.";
		let parsed = parse_response(raw);
		assert_eq!(parsed.reasoning.as_deref(), Some("line one\nline two"));
		assert_eq!(parsed.answer, "The answer is 4.");
	}

	#[test]
	fn test_no_tags_passthrough() {
		let parsed = parse_response("  no tags here \n");
		assert_eq!(parsed.reasoning, None);
		assert_eq!(parsed.answer, "no tags here");

		// Idempotent: re-parsing the answer yields the same answer
		let again = parse_response(&parsed.answer);
		assert_eq!(again.reasoning, None);
		assert_eq!(again.answer, parsed.answer);
	}

	#[test]
	fn test_close_before_open_is_no_match() {
		let raw = "</think>odd<think>";
		let parsed = parse_response(raw);
		assert_eq!(parsed.reasoning, None);
		assert_eq!(parsed.answer, raw.trim());
	}

	#[test]
	fn test_close_without_open_is_no_match() {
		let raw = "something</think>more";
		let parsed = parse_response(raw);
		assert_eq!(parsed.reasoning, None);
		assert_eq!(parsed.answer, raw);
	}

	#[test]
	fn test_unterminated_open_is_no_match() {
		let raw = "<think>never closed, keep everything";
		let parsed = parse_response(raw);
		assert_eq!(parsed.reasoning, None);
		assert_eq!(parsed.answer, raw);
	}

	#[test]
	fn test_first_close_wins_over_greedy_walk() {
		let raw = "<think>a</think>answer mentions </think> later";
		let parsed = parse_response(raw);
		assert_eq!(parsed.reasoning.as_deref(), Some("a"));
		assert_eq!(parsed.answer, "answer mentions </think> later");
	}

	#[test]
	fn test_only_one_split_per_response() {
		let raw = "<think>a</think>mid<think>b</think>tail";
		let parsed = parse_response(raw);
		assert_eq!(parsed.reasoning.as_deref(), Some("a"));
		// The second pair stays verbatim in the answer
		assert_eq!(parsed.answer, "mid<think>b</think>tail");
	}

	#[test]
	fn test_nested_open_marker_inside_reasoning() {
		let raw = "<think>outer <think> inner</think>answer";
		let parsed = parse_response(raw);
		assert_eq!(parsed.reasoning.as_deref(), Some("outer <think> inner"));
		assert_eq!(parsed.answer, "answer");
	}

	#[test]
	fn test_empty_answer_not_promoted_from_reasoning() {
		let parsed = parse_response("<think>all deliberation</think>   ");
		assert_eq!(parsed.reasoning.as_deref(), Some("all deliberation"));
		assert_eq!(parsed.answer, "");
	}

	#[test]
	fn test_whitespace_trimmed_on_both_segments() {
		let parsed = parse_response("<think>\n  padded  \n</think>\n  answer  ");
		assert_eq!(parsed.reasoning.as_deref(), Some("padded"));
		assert_eq!(parsed.answer, "answer");
	}

	#[test]
	fn test_empty_input() {
		let parsed = parse_response("");
		assert_eq!(parsed.reasoning, None);
		assert_eq!(parsed.answer, "");
		assert!(!parsed.has_reasoning());
	}
}
