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

// Zhipu GLM provider implementation

use super::{ChatProvider, PayloadMessage};
use crate::config::ProviderConfig;
use crate::log_debug;
use anyhow::Result;
use reqwest::Client;
use std::sync::OnceLock;

// Global HTTP client with connection reuse
static HTTP_CLIENT: OnceLock<Client> = OnceLock::new();

fn get_client() -> &'static Client {
	HTTP_CLIENT.get_or_init(|| {
		Client::builder()
			.pool_max_idle_per_host(4)
			.pool_idle_timeout(std::time::Duration::from_secs(90))
			.timeout(std::time::Duration::from_secs(300))
			.build()
			.expect("Failed to create HTTP client")
	})
}

/// Zhipu open platform chat completions transport. Endpoint, model,
/// temperature and credentials are fixed at construction; nothing upstream
/// ever sees the API key.
pub struct ZhipuProvider {
	config: ProviderConfig,
}

impl ZhipuProvider {
	pub fn new(config: ProviderConfig) -> Self {
		Self { config }
	}

	fn api_key(&self) -> Result<&str> {
		self.config.api_key.as_deref().ok_or_else(|| {
			anyhow::anyhow!("Zhipu API key not found; set ZHIPU_API_KEY or add it to the config file")
		})
	}
}

#[async_trait::async_trait]
impl ChatProvider for ZhipuProvider {
	fn name(&self) -> &str {
		"zhipu"
	}

	async fn chat_completion(&self, messages: &[PayloadMessage]) -> Result<String> {
		let api_key = self.api_key()?;

		let request_body = serde_json::json!({
			"model": self.config.model,
			"messages": messages,
			"temperature": self.config.temperature,
			"stream": false,
		});

		log_debug!(
			"Sending {} messages to {} (model {})",
			messages.len(),
			self.config.endpoint,
			self.config.model
		);

		let response = get_client()
			.post(&self.config.endpoint)
			.header("Authorization", format!("Bearer {}", api_key))
			.header("Content-Type", "application/json")
			.json(&request_body)
			.send()
			.await?;

		let status = response.status();
		let response_text = response.text().await?;

		// Parse the text to JSON so error bodies can be surfaced meaningfully
		let response_json: serde_json::Value = match serde_json::from_str(&response_text) {
			Ok(json) => json,
			Err(e) => {
				return Err(anyhow::anyhow!(
					"Failed to parse response JSON: {}. Response: {}",
					e,
					response_text
				));
			}
		};

		if !status.is_success() {
			let mut error_details = vec![format!("HTTP {}", status)];
			if let Some(error_obj) = response_json.get("error") {
				if let Some(msg) = error_obj.get("message").and_then(|m| m.as_str()) {
					error_details.push(format!("Message: {}", msg));
				}
				if let Some(code) = error_obj.get("code").and_then(|c| c.as_str()) {
					error_details.push(format!("Code: {}", code));
				}
			}
			return Err(anyhow::anyhow!(
				"Zhipu API error: {}",
				error_details.join(" | ")
			));
		}

		// HTTP 200 can still carry an error object instead of choices
		if response_json.get("choices").is_none() {
			if let Some(error_obj) = response_json.get("error") {
				let message = error_obj
					.get("message")
					.and_then(|m| m.as_str())
					.unwrap_or("Unknown error");
				return Err(anyhow::anyhow!("Zhipu API error: {}", message));
			}
		}

		let content = response_json
			.get("choices")
			.and_then(|c| c.get(0))
			.and_then(|choice| choice.get("message"))
			.and_then(|message| message.get("content"))
			.and_then(|content| content.as_str())
			.ok_or_else(|| {
				anyhow::anyhow!(
					"Zhipu response contained no completion content: {}",
					response_text
				)
			})?;

		Ok(content.to_string())
	}
}
