// Per-message reasoning disclosure state
//
// Each assistant message that carried a reasoning segment gets one entry,
// initially hidden. Only an explicit user toggle mutates the shown flag;
// the parser and the lifecycle controller never touch it after registration.

use crate::session::MessageId;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct DisclosureEntry {
	shown: bool,
	reasoning: String,
}

#[derive(Debug, Default)]
pub struct DisclosureState {
	entries: HashMap<MessageId, DisclosureEntry>,
}

impl DisclosureState {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a message that carries reasoning. The entry starts hidden.
	/// Messages without reasoning are never registered.
	pub fn register(&mut self, id: MessageId, reasoning: String) {
		self.entries.insert(
			id,
			DisclosureEntry {
				shown: false,
				reasoning,
			},
		);
	}

	/// Flip hidden/shown for one message. Returns the new shown state;
	/// toggling a message without reasoning is a no-op returning false.
	pub fn toggle(&mut self, id: MessageId) -> bool {
		match self.entries.get_mut(&id) {
			Some(entry) => {
				entry.shown = !entry.shown;
				entry.shown
			}
			None => false,
		}
	}

	pub fn is_shown(&self, id: MessageId) -> bool {
		self.entries.get(&id).map(|e| e.shown).unwrap_or(false)
	}

	pub fn has_reasoning(&self, id: MessageId) -> bool {
		self.entries.contains_key(&id)
	}

	pub fn reasoning(&self, id: MessageId) -> Option<&str> {
		self.entries.get(&id).map(|e| e.reasoning.as_str())
	}
}
