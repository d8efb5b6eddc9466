// Copyright 2025 Muvon Un Limited
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Transport abstraction over remote chat completion services

use crate::config::ProviderConfig;
use anyhow::Result;
use serde::{Deserialize, Serialize};

pub mod zhipu;

pub use zhipu::ZhipuProvider;

/// One role/content pair as transmitted to the remote service. This is the
/// only shape the transport ever sees; transcript bookkeeping stays behind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadMessage {
	pub role: String,
	pub content: String,
}

/// Trait every chat transport must implement. The controller only
/// distinguishes "succeeded with text" from "failed with reason"; it never
/// inspects status codes or response envelopes itself.
#[async_trait::async_trait]
pub trait ChatProvider: Send + Sync {
	/// Get the provider name (e.g., "zhipu")
	fn name(&self) -> &str;

	/// Send the full transcript and return the raw completion text.
	/// No retries are attempted at this level or above.
	async fn chat_completion(&self, messages: &[PayloadMessage]) -> Result<String>;
}

/// Provider factory to create the appropriate transport from configuration
pub struct ProviderFactory;

impl ProviderFactory {
	pub fn create(config: &ProviderConfig) -> Result<Box<dyn ChatProvider>> {
		match config.provider.to_lowercase().as_str() {
			"zhipu" => Ok(Box::new(ZhipuProvider::new(config.clone()))),
			other => Err(anyhow::anyhow!(
				"Unsupported provider: {}. Supported providers: zhipu",
				other
			)),
		}
	}
}
