// Markdown rendering module

use termimad::MadSkin;

pub struct MarkdownRenderer {
	skin: MadSkin,
}

impl Default for MarkdownRenderer {
	fn default() -> Self {
		Self::new()
	}
}

impl MarkdownRenderer {
	pub fn new() -> Self {
		let mut skin = MadSkin::default();

		// Configure styles for better terminal output using termimad's Color enum
		use termimad::crossterm::style::Attribute;
		use termimad::crossterm::style::Color;

		skin.headers[0].set_fg(Color::Yellow);
		skin.headers[0].add_attr(Attribute::Bold);
		skin.headers[1].set_fg(Color::Blue);
		skin.headers[1].add_attr(Attribute::Bold);
		skin.headers[2].set_fg(Color::Cyan);
		skin.headers[2].add_attr(Attribute::Bold);

		// Style for code blocks and inline code
		skin.code_block.set_bg(Color::Rgb { r: 40, g: 40, b: 40 });
		skin.code_block.set_fg(Color::White);
		skin.inline_code.set_bg(Color::Rgb { r: 60, g: 60, b: 60 });
		skin.inline_code.set_fg(Color::Yellow);

		// Style for emphasis
		skin.italic.set_fg(Color::Cyan);
		skin.bold.set_fg(Color::White);
		skin.bold.add_attr(Attribute::Bold);

		// Style for quotes and lists
		skin.quote_mark.set_fg(Color::Blue);
		skin.bullet.set_fg(Color::Green);

		Self { skin }
	}

	/// Render answer text: markdown through the skin, plain text verbatim
	pub fn render(&self, content: &str) {
		if is_markdown_content(content) {
			self.skin.print_text(content);
		} else {
			println!("{}", content);
		}
	}
}

/// Quick heuristic for whether content benefits from markdown rendering
pub fn is_markdown_content(content: &str) -> bool {
	content.contains("```")
		|| content.contains('#')
		|| content.contains("**")
		|| content.contains("](")
		|| content.contains("\n- ")
		|| content.contains("> ")
}
