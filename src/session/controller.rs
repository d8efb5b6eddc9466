// Request lifecycle controller
//
// Owns the transcript, the disclosure state, and the single-in-flight-request
// invariant. All failure handling ends here: callers of submit observe either
// new transcript/disclosure state or a displayable error, never a panic or a
// half-applied exchange.

use crate::session::disclosure::DisclosureState;
use crate::session::parser::parse_response;
use crate::session::providers::ChatProvider;
use crate::session::{MessageId, Role, Transcript, Turn};
use anyhow::Result;

/// In-flight request state for one conversation. While Pending, further
/// submissions are rejected rather than queued, so at most one exchange is
/// ever outstanding. Success and failure both land back on Idle before
/// submit returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestLifecycle {
	Idle,
	Pending,
}

/// What a call to submit produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
	/// Empty input or a request already in flight; nothing changed.
	Ignored,
	/// One full exchange completed.
	Replied {
		message_id: MessageId,
		answer: String,
		reasoning: Option<String>,
	},
}

pub struct ChatController {
	transcript: Transcript,
	disclosure: DisclosureState,
	lifecycle: RequestLifecycle,
	provider: Box<dyn ChatProvider>,
}

impl ChatController {
	pub fn new(system_prompt: Option<&str>, provider: Box<dyn ChatProvider>) -> Self {
		Self {
			transcript: Transcript::new(system_prompt),
			disclosure: DisclosureState::new(),
			lifecycle: RequestLifecycle::Idle,
			provider,
		}
	}

	pub fn lifecycle(&self) -> RequestLifecycle {
		self.lifecycle
	}

	/// Read-only view of the transcript for display.
	pub fn turns(&self) -> &[Turn] {
		self.transcript.turns()
	}

	pub fn transcript_len(&self) -> usize {
		self.transcript.len()
	}

	pub fn toggle_reasoning(&mut self, id: MessageId) -> bool {
		self.disclosure.toggle(id)
	}

	pub fn is_reasoning_shown(&self, id: MessageId) -> bool {
		self.disclosure.is_shown(id)
	}

	pub fn reasoning_for(&self, id: MessageId) -> Option<&str> {
		self.disclosure.reasoning(id)
	}

	/// Submit one user message and run the exchange to completion.
	///
	/// Empty input and submissions while a request is pending are silent
	/// no-ops. On success the parsed answer (never the reasoning) is appended
	/// as the assistant turn and a hidden disclosure entry is registered when
	/// reasoning is present. On transport failure the transcript keeps the
	/// user turn, the lifecycle returns to Idle, and the error is surfaced to
	/// the caller for display; resubmission is immediately allowed.
	pub async fn submit(&mut self, user_text: &str) -> Result<SubmitOutcome> {
		let trimmed = user_text.trim();
		if trimmed.is_empty() || self.lifecycle == RequestLifecycle::Pending {
			return Ok(SubmitOutcome::Ignored);
		}

		self.transcript.append(Role::User, trimmed);
		self.lifecycle = RequestLifecycle::Pending;

		// The only suspension point in the session core. No other mutation of
		// transcript or lifecycle can happen while this await is outstanding.
		let result = self
			.provider
			.chat_completion(&self.transcript.as_request_payload())
			.await;

		self.lifecycle = RequestLifecycle::Idle;

		let raw = result?;

		let parsed = parse_response(&raw);
		let message_id = self.transcript.append(Role::Assistant, &parsed.answer);
		if parsed.has_reasoning() {
			if let Some(reasoning) = &parsed.reasoning {
				self.disclosure.register(message_id, reasoning.clone());
			}
		}

		Ok(SubmitOutcome::Replied {
			message_id,
			answer: parsed.answer,
			reasoning: parsed.reasoning.filter(|r| !r.is_empty()),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::session::providers::PayloadMessage;

	struct FixedProvider {
		response: String,
	}

	#[async_trait::async_trait]
	impl ChatProvider for FixedProvider {
		fn name(&self) -> &str {
			"fixed"
		}

		async fn chat_completion(&self, _messages: &[PayloadMessage]) -> Result<String> {
			Ok(self.response.clone())
		}
	}

	struct FailingProvider;

	#[async_trait::async_trait]
	impl ChatProvider for FailingProvider {
		fn name(&self) -> &str {
			"failing"
		}

		async fn chat_completion(&self, _messages: &[PayloadMessage]) -> Result<String> {
			Err(anyhow::anyhow!("connection refused"))
		}
	}

	struct EchoCountProvider;

	#[async_trait::async_trait]
	impl ChatProvider for EchoCountProvider {
		fn name(&self) -> &str {
			"echo-count"
		}

		async fn chat_completion(&self, messages: &[PayloadMessage]) -> Result<String> {
			Ok(format!("payload had {} messages", messages.len()))
		}
	}

	fn controller_with(provider: Box<dyn ChatProvider>) -> ChatController {
		ChatController::new(Some("sys"), provider)
	}

	#[tokio::test]
	async fn test_successful_exchange_with_reasoning() {
		let mut controller = controller_with(Box::new(FixedProvider {
			response: "<think>t</think>a".to_string(),
		}));

		let outcome = controller.submit("hi").await.unwrap();
		match outcome {
			SubmitOutcome::Replied {
				message_id,
				answer,
				reasoning,
			} => {
				assert_eq!(answer, "a");
				assert_eq!(reasoning.as_deref(), Some("t"));
				assert!(!controller.is_reasoning_shown(message_id));
				assert_eq!(controller.reasoning_for(message_id), Some("t"));
			}
			other => panic!("expected a reply, got {:?}", other),
		}

		// system, user, assistant - and the assistant turn holds the answer only
		let turns = controller.turns();
		assert_eq!(turns.len(), 3);
		assert_eq!(turns[1].role, Role::User);
		assert_eq!(turns[1].content, "hi");
		assert_eq!(turns[2].role, Role::Assistant);
		assert_eq!(turns[2].content, "a");
		assert_eq!(controller.lifecycle(), RequestLifecycle::Idle);
	}

	#[tokio::test]
	async fn test_reasoning_never_sent_back() {
		let mut controller = controller_with(Box::new(FixedProvider {
			response: "<think>secret</think>visible".to_string(),
		}));
		controller.submit("first").await.unwrap();

		// Swap in a provider that reports what it received
		controller.provider = Box::new(EchoCountProvider);
		controller.submit("second").await.unwrap();

		for turn in controller.turns() {
			assert!(!turn.content.contains("secret"));
		}
	}

	#[tokio::test]
	async fn test_plain_response_has_no_disclosure_entry() {
		let mut controller = controller_with(Box::new(FixedProvider {
			response: "no tags here".to_string(),
		}));

		let outcome = controller.submit("hi").await.unwrap();
		match outcome {
			SubmitOutcome::Replied {
				message_id,
				answer,
				reasoning,
			} => {
				assert_eq!(answer, "no tags here");
				assert_eq!(reasoning, None);
				assert!(!controller.toggle_reasoning(message_id));
			}
			other => panic!("expected a reply, got {:?}", other),
		}
	}

	#[tokio::test]
	async fn test_empty_input_is_noop() {
		let mut controller = controller_with(Box::new(FixedProvider {
			response: "unused".to_string(),
		}));
		let len_before = controller.transcript_len();

		assert_eq!(
			controller.submit("   \n\t").await.unwrap(),
			SubmitOutcome::Ignored
		);
		assert_eq!(controller.transcript_len(), len_before);
		assert_eq!(controller.lifecycle(), RequestLifecycle::Idle);
	}

	#[tokio::test]
	async fn test_submit_while_pending_is_rejected() {
		let mut controller = controller_with(Box::new(FixedProvider {
			response: "unused".to_string(),
		}));
		controller.lifecycle = RequestLifecycle::Pending;
		let len_before = controller.transcript_len();

		assert_eq!(
			controller.submit("hello").await.unwrap(),
			SubmitOutcome::Ignored
		);
		assert_eq!(controller.transcript_len(), len_before);
	}

	#[tokio::test]
	async fn test_failed_exchange_keeps_only_user_turn() {
		let mut controller = controller_with(Box::new(FailingProvider));
		let len_before = controller.transcript_len();

		let result = controller.submit("hi").await;
		assert!(result.is_err());
		assert_eq!(controller.transcript_len(), len_before + 1);
		assert_eq!(controller.turns().last().unwrap().role, Role::User);
		assert_eq!(controller.lifecycle(), RequestLifecycle::Idle);

		// A failed exchange never blocks resubmission
		controller.provider = Box::new(FixedProvider {
			response: "recovered".to_string(),
		});
		let outcome = controller.submit("hi again").await.unwrap();
		assert!(matches!(outcome, SubmitOutcome::Replied { .. }));
	}

	#[tokio::test]
	async fn test_toggle_roundtrip_through_controller() {
		let mut controller = controller_with(Box::new(FixedProvider {
			response: "<think>why</think>because".to_string(),
		}));

		let outcome = controller.submit("hi").await.unwrap();
		let id = match outcome {
			SubmitOutcome::Replied { message_id, .. } => message_id,
			other => panic!("expected a reply, got {:?}", other),
		};

		assert!(controller.toggle_reasoning(id));
		assert!(controller.is_reasoning_shown(id));
		assert!(!controller.toggle_reasoning(id));
		assert!(!controller.is_reasoning_shown(id));
	}
}
