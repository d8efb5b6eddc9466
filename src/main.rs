mod config;
mod session;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use config::Config;

#[derive(Parser)]
#[command(name = "ruminate")]
#[command(version = "0.1.0")]
#[command(about = "Ruminate is a terminal chat client for reasoning language models")]
struct RuminateArgs {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat session
    Chat(ChatArgs),

    /// Show or initialize the configuration file
    Config(ConfigArgs),
}

#[derive(Args, Default)]
struct ChatArgs {
    /// Override the configured model
    #[arg(long, short)]
    model: Option<String>,

    /// Override the configured sampling temperature
    #[arg(long, short)]
    temperature: Option<f32>,
}

#[derive(Args)]
struct ConfigArgs {
    /// Write a default configuration file if none exists
    #[arg(long)]
    init: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = RuminateArgs::parse();

    let mut config = Config::load()?;
    config::set_thread_config(&config);

    match args.command.unwrap_or(Commands::Chat(ChatArgs::default())) {
        Commands::Chat(chat_args) => {
            if let Some(model) = chat_args.model {
                config.provider.model = model;
            }
            if let Some(temperature) = chat_args.temperature {
                config.provider.temperature = temperature;
            }
            config::set_thread_config(&config);
            session::chat::run_interactive_chat(&config).await?;
        }
        Commands::Config(config_args) => {
            if config_args.init {
                let path = config.save()?;
                println!("Wrote default configuration to {}", path.display());
            } else {
                let mut clean = config.clone();
                clean.provider.api_key = None;
                print!("{}", toml::to_string_pretty(&clean)?);
            }
        }
    }

    Ok(())
}
