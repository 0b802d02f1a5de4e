//! CLI entry point for the sales-assistant chat client.

use std::io;
use std::path::PathBuf;
use std::process::Command;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use dotenvy::dotenv;

mod client;
mod config;
mod core;
mod logging;
mod models;
mod palette;
mod repl;
mod tui;

#[cfg(test)]
mod test_support;

use crate::client::{AssistantClient, ClientError, HttpAssistantClient};
use crate::config::Config;
use crate::tui::TuiOptions;

#[derive(Parser, Debug)]
#[command(
    name = "sales-chat",
    author,
    version,
    about = "Terminal chat client for the AccessNine sales assistant",
    long_about = "Chat with the AccessNine AI sales assistant from your terminal.\n\nJust run 'sales-chat' to start the full-screen chat."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Send a single message, print the JSON reply and exit
    #[arg(short, long)]
    prompt: Option<String>,

    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Config profile name
    #[arg(long)]
    profile: Option<String>,

    /// Assistant endpoint URL (overrides config and environment)
    #[arg(long)]
    endpoint: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Disable the alternate screen buffer (inline mode)
    #[arg(long = "no-alt-screen")]
    no_alt_screen: bool,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Run system diagnostics and check the assistant endpoint
    Doctor,
    /// Generate shell completions
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Line-mode chat without the full-screen UI
    Repl,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    match logging::init(cli.verbose) {
        Ok(path) => logging::info(format!("Logging to {}", path.display())),
        Err(err) => {
            logging::set_verbose(cli.verbose);
            eprintln!("Warning: file logging disabled: {err:#}");
        }
    }

    if let Some(command) = cli.command.clone() {
        return match command {
            Commands::Doctor => {
                run_doctor(&cli).await;
                Ok(())
            }
            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
            Commands::Repl => {
                let config = load_config_from_cli(&cli)?;
                repl::run_repl(&config).await
            }
        };
    }

    let config = load_config_from_cli(&cli)?;

    if let Some(prompt) = cli.prompt.as_deref() {
        return run_one_shot(&config, prompt).await;
    }

    run_interactive(&cli, &config).await
}

fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

fn load_config_from_cli(cli: &Cli) -> Result<Config> {
    let profile = cli
        .profile
        .clone()
        .or_else(|| std::env::var("SALES_CHAT_PROFILE").ok());
    let mut config = Config::load(cli.config.clone(), profile.as_deref())?;
    if let Some(endpoint) = cli.endpoint.as_deref() {
        config.override_endpoint(endpoint)?;
    }
    Ok(config)
}

async fn run_interactive(cli: &Cli, config: &Config) -> Result<()> {
    let options = TuiOptions {
        assistant_name: config.assistant_name().to_string(),
        endpoint: config.endpoint(),
        sidebar_items: config.sidebar_items(),
        theme: config.theme_name().to_string(),
        use_alt_screen: should_use_alt_screen(cli, config),
    };
    tui::run_tui(config, options).await
}

async fn run_one_shot(config: &Config, prompt: &str) -> Result<()> {
    if prompt.trim().is_empty() {
        anyhow::bail!("Prompt is empty");
    }
    let client = HttpAssistantClient::new(config)?;
    eprintln!("생각 중...");
    let reply = client.send_message(prompt).await?;
    println!("{}", serde_json::to_string_pretty(&reply)?);
    Ok(())
}

fn should_use_alt_screen(cli: &Cli, config: &Config) -> bool {
    if cli.no_alt_screen {
        return false;
    }

    match config.alternate_screen_mode().as_str() {
        "always" => true,
        "never" => false,
        _ => !is_zellij(),
    }
}

fn is_zellij() -> bool {
    std::env::var_os("ZELLIJ").is_some()
}

fn rustc_version() -> String {
    Command::new("rustc")
        .arg("--version")
        .output()
        .ok()
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map_or_else(|| "unknown".to_string(), |v| v.trim().to_string())
}

async fn run_doctor(cli: &Cli) {
    use colored::Colorize;

    let (blue_r, blue_g, blue_b) = palette::BRAND_BLUE_RGB;
    let (sky_r, sky_g, sky_b) = palette::BRAND_SKY_RGB;
    let (amber_r, amber_g, amber_b) = palette::BRAND_AMBER_RGB;
    let (red_r, red_g, red_b) = palette::BRAND_RED_RGB;

    println!(
        "{}",
        "Sales Chat Doctor".truecolor(blue_r, blue_g, blue_b).bold()
    );
    println!("{}", "=================".truecolor(sky_r, sky_g, sky_b));
    println!();

    println!("{}", "Version Information:".bold());
    println!("  sales-chat: {}", env!("CARGO_PKG_VERSION"));
    println!("  rust: {}", rustc_version());
    println!();

    println!("{}", "Configuration:".bold());
    let config_path = cli.config.clone().or_else(config::default_config_path);
    match config_path {
        Some(path) if path.exists() => println!(
            "  {} config found at {}",
            "✓".truecolor(sky_r, sky_g, sky_b),
            path.display()
        ),
        Some(path) => println!(
            "  {} {} not found (will use defaults)",
            "!".truecolor(amber_r, amber_g, amber_b),
            path.display()
        ),
        None => println!(
            "  {} no home directory; using defaults",
            "!".truecolor(amber_r, amber_g, amber_b)
        ),
    }

    let config = match load_config_from_cli(cli) {
        Ok(config) => config,
        Err(err) => {
            println!(
                "  {} config is invalid: {err:#}",
                "✗".truecolor(red_r, red_g, red_b)
            );
            return;
        }
    };
    println!("  {} endpoint: {}", "·".dimmed(), config.endpoint());
    println!(
        "  {} request timeout: {}s",
        "·".dimmed(),
        config.request_timeout().as_secs()
    );
    println!("  {} theme: {}", "·".dimmed(), config.theme_name());
    println!(
        "  {} alternate screen: {}",
        "·".dimmed(),
        config.alternate_screen_mode()
    );

    println!();
    println!("{}", "Endpoint Connectivity:".bold());
    print!("  {} Contacting assistant service...", "·".dimmed());
    {
        use std::io::Write;
        std::io::stdout().flush().ok();
    }

    let reachability = match HttpAssistantClient::new(&config) {
        Ok(client) => client.check_reachable().await,
        Err(err) => Err(ClientError::Network(format!("{err:#}"))),
    };
    match reachability {
        Ok(status) => println!(
            "\r  {} Endpoint reachable (HTTP {status})",
            "✓".truecolor(sky_r, sky_g, sky_b)
        ),
        Err(err) => {
            println!(
                "\r  {} Endpoint unreachable",
                "✗".truecolor(red_r, red_g, red_b)
            );
            match err {
                ClientError::Timeout(_) => {
                    println!("    Connection timed out. Check your network connection");
                }
                ClientError::Network(_) => {
                    println!("    Connection failed. Is the assistant service running?");
                    println!("    Error: {err}");
                }
                other => println!("    Error: {other}"),
            }
        }
    }

    println!();
    println!("{}", "Platform:".bold());
    println!("  OS: {}", std::env::consts::OS);
    println!("  Arch: {}", std::env::consts::ARCH);
    if is_zellij() {
        println!(
            "  {} running inside zellij; alternate screen is off in auto mode",
            "!".truecolor(amber_r, amber_g, amber_b)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::lock_test_env;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_one_shot_and_overrides() {
        let cli = Cli::try_parse_from([
            "sales-chat",
            "-p",
            "시멘트 단가 알려줘",
            "--endpoint",
            "http://127.0.0.1:9000/api/chat",
            "--no-alt-screen",
        ])
        .expect("parse");
        assert_eq!(cli.prompt.as_deref(), Some("시멘트 단가 알려줘"));
        assert_eq!(
            cli.endpoint.as_deref(),
            Some("http://127.0.0.1:9000/api/chat")
        );
        assert!(cli.no_alt_screen);
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_subcommands() {
        let cli = Cli::try_parse_from(["sales-chat", "repl"]).expect("parse");
        assert!(matches!(cli.command, Some(Commands::Repl)));
        let cli = Cli::try_parse_from(["sales-chat", "completions", "bash"]).expect("parse");
        assert!(matches!(
            cli.command,
            Some(Commands::Completions { shell: Shell::Bash })
        ));
    }

    #[test]
    fn no_alt_screen_flag_wins() {
        let cli = Cli::try_parse_from(["sales-chat", "--no-alt-screen"]).expect("parse");
        assert!(!should_use_alt_screen(&cli, &Config::default()));
    }

    #[test]
    fn alt_screen_follows_config_mode() {
        let _guard = lock_test_env();
        let cli = Cli::try_parse_from(["sales-chat"]).expect("parse");

        let always: Config = toml::from_str("[tui]\nalternate_screen = \"always\"\n")
            .expect("config");
        assert!(should_use_alt_screen(&cli, &always));

        let never: Config =
            toml::from_str("[tui]\nalternate_screen = \"never\"\n").expect("config");
        assert!(!should_use_alt_screen(&cli, &never));
    }

    #[test]
    fn endpoint_flag_overrides_config() {
        let _guard = lock_test_env();
        let dir = std::env::temp_dir().join(format!("sales-chat-main-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("dir");
        let path = dir.join("config.toml");
        std::fs::write(&path, "endpoint = \"http://localhost:1/api/chat\"\n").expect("write");

        let cli = Cli::try_parse_from([
            "sales-chat",
            "--config",
            path.to_str().expect("utf8 path"),
            "--endpoint",
            "https://sales.example.com/api/chat",
        ])
        .expect("parse");
        let config = load_config_from_cli(&cli).expect("config");
        assert_eq!(config.endpoint(), "https://sales.example.com/api/chat");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn invalid_endpoint_flag_is_rejected() {
        let _guard = lock_test_env();
        let cli = Cli::try_parse_from(["sales-chat", "--endpoint", "ftp://nowhere"])
            .expect("parse");
        assert!(load_config_from_cli(&cli).is_err());
    }
}
