// Interactive chat loop

mod input;
mod markdown;

use crate::config::Config;
use crate::{log_error, log_info};
use crate::session::providers::ProviderFactory;
use crate::session::{ChatController, MessageId, SubmitOutcome};
use anyhow::Result;
use colored::Colorize;
use input::read_user_input;
use markdown::MarkdownRenderer;

/// Run an interactive conversation until the user exits.
pub async fn run_interactive_chat(config: &Config) -> Result<()> {
	let provider = ProviderFactory::create(&config.provider)?;
	log_info!(
		"Using provider {} with model {}",
		provider.name(),
		config.provider.model
	);
	let mut controller = ChatController::new(Some(&config.system_prompt), provider);
	let renderer = MarkdownRenderer::new();

	// Assistant messages that carry reasoning, in arrival order, so the user
	// can address them by ordinal with /think
	let mut reasoning_messages: Vec<MessageId> = Vec::new();

	print_banner(&config.provider.model);

	loop {
		let line = read_user_input()?;
		let line = line.trim();

		if line.is_empty() {
			continue;
		}

		if let Some(command) = line.strip_prefix('/') {
			if handle_command(command, &mut controller, &reasoning_messages, &renderer) {
				break;
			}
			continue;
		}

		// Input is only read while Idle, so this maps the lifecycle state
		// onto input enable/disable the way a GUI would
		println!("{}", "thinking…".bright_black());

		match controller.submit(line).await {
			Ok(SubmitOutcome::Replied {
				message_id,
				answer,
				reasoning,
			}) => {
				if answer.is_empty() {
					println!("{}", "(no answer text)".bright_black());
				} else {
					renderer.render(&answer);
				}
				if reasoning.is_some() {
					reasoning_messages.push(message_id);
					println!(
						"{}",
						format!(
							"reasoning available - /think to show it (message {})",
							reasoning_messages.len()
						)
						.bright_black()
					);
				}
			}
			Ok(SubmitOutcome::Ignored) => {}
			Err(e) => {
				// Transcript history survives a failed exchange; the user can
				// simply resubmit
				log_error!("Request failed: {}", e);
			}
		}
	}

	Ok(())
}

/// Handle one slash command. Returns true when the session should end.
fn handle_command(
	command: &str,
	controller: &mut ChatController,
	reasoning_messages: &[MessageId],
	renderer: &MarkdownRenderer,
) -> bool {
	let mut parts = command.split_whitespace();
	let name = parts.next().unwrap_or("");

	match name {
		"exit" | "quit" => return true,
		"help" => print_help(),
		"history" => show_history(controller, renderer),
		"think" => {
			let index = match parts.next() {
				Some(arg) => match arg.parse::<usize>() {
					Ok(n) if n >= 1 && n <= reasoning_messages.len() => n - 1,
					_ => {
						log_error!(
							"Usage: /think [1..{}]",
							reasoning_messages.len().max(1)
						);
						return false;
					}
				},
				None => match reasoning_messages.len().checked_sub(1) {
					Some(last) => last,
					None => {
						println!("{}", "No reasoning to show yet.".bright_black());
						return false;
					}
				},
			};

			let id = reasoning_messages[index];
			if controller.toggle_reasoning(id) {
				if let Some(reasoning) = controller.reasoning_for(id) {
					println!("{}", "─── reasoning ───".bright_black());
					println!("{}", reasoning.bright_black().italic());
					println!("{}", "─────────────────".bright_black());
				}
			} else {
				println!("{}", "Reasoning hidden again.".bright_black());
			}
		}
		_ => log_error!("Unknown command: /{}. Try /help", name),
	}

	false
}

fn show_history(controller: &ChatController, renderer: &MarkdownRenderer) {
	for turn in controller.turns() {
		match turn.role {
			crate::session::Role::System => continue,
			crate::session::Role::User => {
				println!("{} {}", "you:".bright_blue(), turn.content)
			}
			crate::session::Role::Assistant => {
				println!("{}", "assistant:".bright_green());
				renderer.render(&turn.content);
				if controller.is_reasoning_shown(turn.id) {
					if let Some(reasoning) = controller.reasoning_for(turn.id) {
						println!("{}", reasoning.bright_black().italic());
					}
				}
			}
		}
	}
}

fn print_banner(model: &str) {
	println!(
		"{} {}",
		"ruminate".bright_green().bold(),
		format!("({})", model).bright_black()
	);
	println!(
		"{}",
		"Type a message to chat, /help for commands.".bright_black()
	);
}

fn print_help() {
	println!("{}", "Commands:".bright_cyan());
	println!("  /think [N]   toggle the reasoning block of the Nth reply (default: latest)");
	println!("  /history     redisplay the conversation");
	println!("  /help        show this help");
	println!("  /exit        leave the session (also /quit or Ctrl+D)");
}
