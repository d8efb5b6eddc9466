// User input handling module

use anyhow::Result;
use colored::*;
use rustyline::error::ReadlineError;
use rustyline::{CompletionType, Config as RustylineConfig, EditMode, Editor};

// Read one line of user input with history support
pub fn read_user_input() -> Result<String> {
	// Configure rustyline
	let config = RustylineConfig::builder()
		.completion_type(CompletionType::List)
		.edit_mode(EditMode::Emacs)
		.auto_add_history(true) // Automatically add lines to history
		.bell_style(rustyline::config::BellStyle::None) // No bell
		.build();

	let mut editor: Editor<(), rustyline::history::DefaultHistory> =
		Editor::with_config(config)?;

	let prompt = "> ".bright_blue().to_string();

	match editor.readline(&prompt) {
		Ok(line) => {
			let _ = editor.add_history_entry(line.clone());
			Ok(line)
		}
		Err(ReadlineError::Interrupted) => {
			// Ctrl+C clears the current line
			println!("\nCancelled");
			Ok(String::new())
		}
		Err(ReadlineError::Eof) => {
			// Ctrl+D
			println!("\nExiting session.");
			Ok("/exit".to_string())
		}
		Err(err) => {
			println!("Error: {:?}", err);
			Ok(String::new())
		}
	}
}
