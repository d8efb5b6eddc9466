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

// Configuration loading and logging macros

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;

const CONFIG_FILE_NAME: &str = "config.toml";
const API_KEY_ENV: &str = "ZHIPU_API_KEY";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum LogLevel {
	#[serde(rename = "none")]
	None,
	#[serde(rename = "info")]
	Info,
	#[serde(rename = "debug")]
	Debug,
}

impl Default for LogLevel {
	fn default() -> Self {
		Self::None
	}
}

impl LogLevel {
	/// Check if info logging is enabled
	pub fn is_info_enabled(&self) -> bool {
		matches!(self, LogLevel::Info | LogLevel::Debug)
	}

	/// Check if debug logging is enabled
	pub fn is_debug_enabled(&self) -> bool {
		matches!(self, LogLevel::Debug)
	}
}

// Default functions

fn default_endpoint() -> String {
	"https://open.bigmodel.cn/api/paas/v4/chat/completions".to_string()
}

fn default_model() -> String {
	"glm-z1-flash".to_string()
}

fn default_temperature() -> f32 {
	0.6
}

fn default_provider_name() -> String {
	"zhipu".to_string()
}

fn default_system_prompt() -> String {
	"You are a helpful assistant. Think through the problem step by step inside \
<think> tags before answering, then give the final answer outside the tags."
		.to_string()
}

/// Transport configuration, injected into the provider at construction time.
/// Credentials live here and nowhere else; the session core never reads them.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
	#[serde(default = "default_provider_name")]
	pub provider: String,
	#[serde(default = "default_endpoint")]
	pub endpoint: String,
	#[serde(default = "default_model")]
	pub model: String,
	#[serde(default = "default_temperature")]
	pub temperature: f32,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub api_key: Option<String>,
}

impl Default for ProviderConfig {
	fn default() -> Self {
		Self {
			provider: default_provider_name(),
			endpoint: default_endpoint(),
			model: default_model(),
			temperature: default_temperature(),
			api_key: None,
		}
	}
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
	#[serde(default)]
	pub log_level: LogLevel,
	#[serde(default = "default_system_prompt")]
	pub system_prompt: String,
	#[serde(default)]
	pub provider: ProviderConfig,
	#[serde(skip)]
	pub config_path: Option<PathBuf>,
}

impl Config {
	pub fn get_log_level(&self) -> LogLevel {
		self.log_level.clone()
	}

	/// Resolve the config file path: ~/.config/ruminate/config.toml,
	/// falling back to ./.ruminate/config.toml when no home dir exists.
	pub fn config_file_path() -> PathBuf {
		match dirs::home_dir() {
			Some(home) => home.join(".config").join("ruminate").join(CONFIG_FILE_NAME),
			None => PathBuf::from(".ruminate").join(CONFIG_FILE_NAME),
		}
	}

	/// Load configuration from the config file, creating defaults when absent.
	/// Environment variables take precedence over config file values.
	pub fn load() -> Result<Self> {
		let config_path = Self::config_file_path();

		let mut config = if config_path.exists() {
			let config_str = fs::read_to_string(&config_path).context(format!(
				"Failed to read config from {}",
				config_path.display()
			))?;
			toml::from_str::<Config>(&config_str).context("Failed to parse TOML configuration")?
		} else {
			Self {
				system_prompt: default_system_prompt(),
				..Default::default()
			}
		};

		config.config_path = Some(config_path);

		// Environment variable takes precedence over the config file value
		if let Ok(api_key) = std::env::var(API_KEY_ENV) {
			config.provider.api_key = Some(api_key);
		}

		Ok(config)
	}

	/// Write the current configuration to its config file, creating parent
	/// directories as needed. The API key is kept out of the written file.
	pub fn save(&self) -> Result<PathBuf> {
		let config_path = match &self.config_path {
			Some(path) => path.clone(),
			None => Self::config_file_path(),
		};

		if let Some(parent) = config_path.parent() {
			fs::create_dir_all(parent).context(format!(
				"Failed to create config directory {}",
				parent.display()
			))?;
		}

		let mut clean = self.clone();
		clean.provider.api_key = None;

		let toml_str =
			toml::to_string_pretty(&clean).context("Failed to serialize configuration")?;
		fs::write(&config_path, toml_str).context(format!(
			"Failed to write config to {}",
			config_path.display()
		))?;

		Ok(config_path)
	}
}

// Logging macros for different log levels
// These macros automatically check the current log level and only print if appropriate

thread_local! {
	static CURRENT_CONFIG: RefCell<Option<Config>> = const { RefCell::new(None) };
}

/// Set the current config for the thread (to be used by logging macros)
pub fn set_thread_config(config: &Config) {
	CURRENT_CONFIG.with(|c| {
		*c.borrow_mut() = Some(config.clone());
	});
}

/// Get the current config for the thread
pub fn with_thread_config<F, R>(f: F) -> Option<R>
where
	F: FnOnce(&Config) -> R,
{
	CURRENT_CONFIG.with(|c| (*c.borrow()).as_ref().map(f))
}

/// Info logging macro with automatic cyan coloring
/// Shows info messages when log level is Info OR Debug
#[macro_export]
macro_rules! log_info {
	($fmt:expr) => {
		if let Some(should_log) = $crate::config::with_thread_config(|config| config.get_log_level().is_info_enabled()) {
			if should_log {
				use colored::Colorize;
				println!("{}", $fmt.cyan());
			}
		}
	};
	($fmt:expr, $($arg:expr),*) => {
		if let Some(should_log) = $crate::config::with_thread_config(|config| config.get_log_level().is_info_enabled()) {
			if should_log {
				use colored::Colorize;
				println!("{}", format!($fmt, $($arg),*).cyan());
			}
		}
	};
}

/// Debug logging macro with automatic bright blue coloring
#[macro_export]
macro_rules! log_debug {
	($fmt:expr) => {
		if let Some(should_log) = $crate::config::with_thread_config(|config| config.get_log_level().is_debug_enabled()) {
			if should_log {
				use colored::Colorize;
				println!("{}", $fmt.bright_blue());
			}
		}
	};
	($fmt:expr, $($arg:expr),*) => {
		if let Some(should_log) = $crate::config::with_thread_config(|config| config.get_log_level().is_debug_enabled()) {
			if should_log {
				use colored::Colorize;
				println!("{}", format!($fmt, $($arg),*).bright_blue());
			}
		}
	};
}

/// Error logging macro with automatic bright red coloring
/// Always visible regardless of log level (errors should always be shown)
#[macro_export]
macro_rules! log_error {
	($fmt:expr) => {{
		use colored::Colorize;
		eprintln!("{}", $fmt.bright_red());
	}};
	($fmt:expr, $($arg:expr),*) => {{
		use colored::Colorize;
		eprintln!("{}", format!($fmt, $($arg),*).bright_red());
	}};
}
