use anyhow::{anyhow, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use pstep_lib::{
    build_command_line, detect_platform, local_os, render, Config, ExitOutcome, LocalHost,
    PowerShellStep,
};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "pstep")]
#[command(about = "Run a PowerShell script as a build step and classify its exit code")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a script as a build step and report the outcome
    Run {
        /// Inline script text
        command: Option<String>,

        /// Read the script text from a file instead
        #[arg(long, conflicts_with = "command")]
        file: Option<PathBuf>,

        /// Stop at the first failing command instead of continuing
        #[arg(long)]
        stop_on_error: bool,

        /// Load the user's PowerShell profile
        #[arg(long)]
        profile: bool,

        /// Exit code that marks the build unstable instead of failed (0 disables)
        #[arg(long, env = "PSTEP_UNSTABLE_RETURN")]
        unstable_return: Option<i32>,

        /// Working directory for the script process
        #[arg(long)]
        cwd: Option<PathBuf>,

        /// Show what would be executed without running
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the rendered script-file contents
    Render {
        /// Inline script text
        command: Option<String>,

        /// Read the script text from a file instead
        #[arg(long, conflicts_with = "command")]
        file: Option<PathBuf>,

        /// Stop at the first failing command instead of continuing
        #[arg(long)]
        stop_on_error: bool,
    },

    /// Print the interpreter command line for a script at a given path
    Argv {
        /// Path the script file will have when launched
        script_path: String,

        /// Treat the path as living on a remote worker
        #[arg(long)]
        remote: bool,

        /// Load the user's PowerShell profile
        #[arg(long)]
        profile: bool,

        /// Output format
        #[arg(long, default_value = "human")]
        format: ArgvFormat,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(clap::ValueEnum, Clone)]
enum ArgvFormat {
    Human,
    Json,
}

#[tokio::main]
async fn main() {
    match run().await {
        Ok(exit_code) => process::exit(exit_code),
        Err(err) => {
            eprintln!("Error: {err}");
            process::exit(1);
        }
    }
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    let config = Config::load_with_override(cli.config)?;

    match cli.command {
        Commands::Run {
            command,
            file,
            stop_on_error,
            profile,
            unstable_return,
            cwd,
            dry_run,
        } => {
            handle_run(
                &config,
                command,
                file,
                stop_on_error,
                profile,
                unstable_return,
                cwd,
                dry_run,
            )
            .await
        }
        Commands::Render {
            command,
            file,
            stop_on_error,
        } => handle_render(&config, command, file, stop_on_error),
        Commands::Argv {
            script_path,
            remote,
            profile,
            format,
        } => handle_argv(&config, &script_path, remote, profile, format),
        Commands::Completions { shell } => handle_completions(shell),
    }
}

#[allow(clippy::too_many_arguments)]
async fn handle_run(
    config: &Config,
    command: Option<String>,
    file: Option<PathBuf>,
    stop_on_error: bool,
    profile: bool,
    unstable_return: Option<i32>,
    cwd: Option<PathBuf>,
    dry_run: bool,
) -> Result<i32> {
    let command_text = resolve_command(command, file)?;
    let script_config = config.script_config(
        command_text,
        stop_on_error.then_some(true),
        profile.then_some(true),
        unstable_return,
    );

    let step = PowerShellStep::new(script_config);
    let host = LocalHost::with_cwd(cwd)?;

    if dry_run {
        let argv = step.dry_run(&host).await?;
        println!("Would execute: {}", argv.join(" "));
        return Ok(0);
    }

    let outcome = step.run(&host).await?;
    println!("Build step result: {outcome}");

    // An unstable build is degraded but continuing, so only a failure
    // stops the surrounding pipeline.
    Ok(match outcome {
        ExitOutcome::Success | ExitOutcome::Unstable => 0,
        ExitOutcome::Failure => 1,
    })
}

fn handle_render(
    config: &Config,
    command: Option<String>,
    file: Option<PathBuf>,
    stop_on_error: bool,
) -> Result<i32> {
    let command_text = resolve_command(command, file)?;
    let script_config =
        config.script_config(command_text, stop_on_error.then_some(true), None, None);

    let rendered = render(&script_config, local_os());
    println!("{}", rendered.text);
    Ok(0)
}

fn handle_argv(
    config: &Config,
    script_path: &str,
    remote: bool,
    profile: bool,
    format: ArgvFormat,
) -> Result<i32> {
    let use_profile = profile || config.step.use_profile.unwrap_or(false);

    let platform = detect_platform(script_path, remote, local_os());
    let argv = build_command_line(platform, script_path, use_profile);

    match format {
        ArgvFormat::Human => {
            for token in &argv {
                println!("{token}");
            }
        }
        ArgvFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&argv)?);
        }
    }

    Ok(0)
}

fn handle_completions(shell: Shell) -> Result<i32> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "pstep", &mut std::io::stdout());
    Ok(0)
}

fn resolve_command(command: Option<String>, file: Option<PathBuf>) -> Result<String> {
    match (command, file) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) => std::fs::read_to_string(&path)
            .map_err(|err| anyhow!("Cannot read {}: {err}", path.display())),
        (None, None) => Err(anyhow!("Provide script text inline or via --file")),
    }
}
