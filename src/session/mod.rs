// Session module for conversational state

pub mod chat; // Interactive chat loop
pub mod controller; // Request lifecycle controller
pub mod disclosure; // Per-message reasoning disclosure state
pub mod parser; // Response segmentation
pub mod providers; // Transport abstraction layer

pub use controller::{ChatController, RequestLifecycle, SubmitOutcome};
pub use disclosure::DisclosureState;
pub use parser::{parse_response, ParsedResponse};
pub use providers::{ChatProvider, PayloadMessage, ProviderFactory};

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

fn current_timestamp() -> u64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.unwrap_or_default()
		.as_secs()
}

/// Opaque identity of a single transcript turn. Presentation and disclosure
/// state key off this instead of positions or UI handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(Uuid);

impl MessageId {
	pub(crate) fn new() -> Self {
		Self(Uuid::new_v4())
	}
}

impl fmt::Display for MessageId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.fmt(f)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
	System,
	User,
	Assistant,
}

impl Role {
	pub fn as_str(&self) -> &'static str {
		match self {
			Role::System => "system",
			Role::User => "user",
			Role::Assistant => "assistant",
		}
	}
}

/// One role-tagged message in the conversation transcript.
/// Immutable once appended.
#[derive(Debug, Clone)]
pub struct Turn {
	pub id: MessageId,
	pub role: Role,
	pub content: String,
	pub timestamp: u64,
}

/// Ordered, append-only conversation history. The full transcript is replayed
/// to the remote service on every request; entries are never reordered,
/// mutated, or removed for the life of the session.
#[derive(Debug, Default)]
pub struct Transcript {
	turns: Vec<Turn>,
}

impl Transcript {
	/// Create a transcript, inserting the system turn exactly once when a
	/// system prompt is configured.
	pub fn new(system_prompt: Option<&str>) -> Self {
		let mut transcript = Self { turns: Vec::new() };
		if let Some(prompt) = system_prompt {
			transcript.push(Role::System, prompt);
		}
		transcript
	}

	fn push(&mut self, role: Role, content: &str) -> MessageId {
		let turn = Turn {
			id: MessageId::new(),
			role,
			content: content.to_string(),
			timestamp: current_timestamp(),
		};
		let id = turn.id;
		self.turns.push(turn);
		id
	}

	/// Append a turn at the end of the transcript. Infallible for any
	/// role/content combination; never touches prior entries.
	pub fn append(&mut self, role: Role, content: &str) -> MessageId {
		self.push(role, content)
	}

	pub fn turns(&self) -> &[Turn] {
		&self.turns
	}

	pub fn len(&self) -> usize {
		self.turns.len()
	}

	pub fn is_empty(&self) -> bool {
		self.turns.is_empty()
	}

	/// Project the transcript into the role/content pairs sent to the remote
	/// service: system turn first when present, then user/assistant turns in
	/// chronological order. Internal bookkeeping (ids, timestamps) stays out.
	pub fn as_request_payload(&self) -> Vec<PayloadMessage> {
		self.turns
			.iter()
			.map(|turn| PayloadMessage {
				role: turn.role.as_str().to_string(),
				content: turn.content.clone(),
			})
			.collect()
	}
}
