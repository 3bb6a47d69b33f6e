use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use persona_console::config::AppConfig;
use persona_console::core::content::{ContentType, ScheduleRequest, WorkflowHandle};
use persona_console::core::logging;
use persona_console::core::personality::{resolve_config, set_slider, PersonalityEditor, SliderSet};
use persona_console::core::service::{
    ConnectionTarget, ContentService, HttpContentService, InteractionRequest,
};

/// Persona Console - personality tuning and content scheduling.
#[derive(Parser, Debug)]
#[command(name = "persona-console")]
#[command(version)]
#[command(about = "Operator console for the persona content service.", long_about = None)]
struct Cli {
    /// Config file (default: ~/.config/persona-console/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the service base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the personality config derived from slider values (no service call)
    Derive {
        /// Slider value as name=value; repeatable, unset sliders use the configured defaults
        #[arg(long = "slider", value_parser = parse_slider_arg)]
        sliders: Vec<(String, i64)>,

        /// Interest tag; repeatable, replaces the configured defaults when given
        #[arg(long = "interest")]
        interests: Vec<String>,
    },

    /// Probe the service once
    Health,

    /// Generate content and optionally save or schedule it
    Generate(GenerateArgs),

    /// Inspect or edit the active personality
    Personality {
        #[command(subcommand)]
        action: PersonalityCommands,
    },

    /// List recent engagement interactions
    Interactions,

    /// Have the persona reply to an incoming interaction
    Interact {
        /// comment, message, ...
        #[arg(long, default_value = "comment")]
        kind: String,

        /// subscriber, new_follower, ...
        #[arg(long, default_value = "subscriber")]
        user_type: String,

        #[arg(long)]
        message: String,
    },

    /// Inspect or change the service settings
    Settings {
        #[command(subcommand)]
        action: SettingsCommands,
    },
}

#[derive(Subcommand, Debug)]
enum SettingsCommands {
    /// Print the current settings (secrets redacted)
    Show,

    /// Change selected settings and save them
    Set {
        #[arg(long)]
        post_generation_limit: Option<u32>,

        /// Minutes before replying to comments
        #[arg(long)]
        comment_response_minutes: Option<u32>,

        /// Minutes before replying to direct messages
        #[arg(long)]
        dm_response_minutes: Option<u32>,

        /// daily, weekly, ...
        #[arg(long)]
        backup_frequency: Option<String>,

        #[arg(long)]
        notifications: Option<bool>,
    },

    /// Check the service's connection to a backend (openai or mongodb)
    Test { target: ConnectionTarget },
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[arg(long)]
    topic: String,

    /// post, story, reply, comment, message or bio
    #[arg(long)]
    content_type: Option<ContentType>,

    #[arg(long)]
    tone: Option<String>,

    #[arg(long)]
    word_count: Option<u32>,

    #[arg(long)]
    hashtags: bool,

    /// Persist the result without scheduling
    #[arg(long, conflicts_with_all = ["schedule_date", "schedule_time"])]
    save: bool,

    /// Publish date (YYYY-MM-DD)
    #[arg(long, requires = "schedule_time")]
    schedule_date: Option<String>,

    /// Publish time (HH:MM)
    #[arg(long, requires = "schedule_date")]
    schedule_time: Option<String>,
}

#[derive(Subcommand, Debug)]
enum PersonalityCommands {
    /// Print the active personality document
    Show,

    /// Ask the personality to answer a prompt
    Respond {
        #[arg(long)]
        prompt: String,
    },

    /// Change sliders and interests, then publish
    UpdateSliders {
        /// Slider value as name=value; repeatable
        #[arg(long = "slider", value_parser = parse_slider_arg)]
        sliders: Vec<(String, i64)>,

        /// Interest tag to toggle; repeatable
        #[arg(long = "toggle")]
        toggles: Vec<String>,

        /// Print the document instead of publishing it
        #[arg(long)]
        dry_run: bool,
    },
}

fn parse_slider_arg(s: &str) -> std::result::Result<(String, i64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{s}'"))?;
    let value = value
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid value for '{name}': {e}"))?;
    Ok((name.trim().to_string(), value))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    if let Some(base_url) = cli.base_url.clone() {
        config.service.base_url = base_url;
    }

    let _log_guard = logging::init(&config.logging);
    log::info!("{} v{} starting", persona_console::NAME, persona_console::VERSION);

    run(cli.command, &config).await
}

async fn run(command: Commands, config: &AppConfig) -> Result<()> {
    if let Commands::Derive { sliders, interests } = &command {
        return derive(config, sliders, interests);
    }

    let service: Arc<dyn ContentService> = Arc::new(
        HttpContentService::from_config(&config.service)
            .context("failed to create service client")?,
    );

    match command {
        Commands::Derive { .. } => Ok(()),
        Commands::Health => {
            let status = service.check_health().await;
            println!("{} ({})", status, config.service.base_url);
            if !status.is_healthy() {
                bail!("service is {status}");
            }
            Ok(())
        }
        Commands::Generate(args) => generate(service, config, args).await,
        Commands::Personality { action } => personality(service.as_ref(), config, action).await,
        Commands::Interactions => {
            let interactions = service
                .list_recent_interactions()
                .await
                .context("failed to load interactions")?;
            if interactions.is_empty() {
                println!("No recent interactions.");
            }
            for i in interactions {
                let when = i
                    .timestamp
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default();
                println!("[{}] {} {}: {}", when, i.kind, i.user_type.unwrap_or_default(), i.message);
                if let Some(response) = i.response {
                    println!("    -> {response}");
                }
            }
            Ok(())
        }
        Commands::Interact {
            kind,
            user_type,
            message,
        } => {
            let reply = service
                .process_interaction(&InteractionRequest::new(kind, user_type, message))
                .await
                .context("failed to process interaction")?;
            println!("{reply}");
            Ok(())
        }
        Commands::Settings { action } => settings(service.as_ref(), action).await,
    }
}

async fn settings(service: &dyn ContentService, action: SettingsCommands) -> Result<()> {
    match action {
        SettingsCommands::Show => {
            let settings = service.get_settings().await.context("failed to load settings")?;
            println!("{settings:#?}");
        }
        SettingsCommands::Set {
            post_generation_limit,
            comment_response_minutes,
            dm_response_minutes,
            backup_frequency,
            notifications,
        } => {
            let mut settings = service.get_settings().await.context("failed to load settings")?;
            if let Some(limit) = post_generation_limit {
                settings.post_generation_limit = limit;
            }
            if let Some(minutes) = comment_response_minutes {
                settings.response_time.comments = minutes;
            }
            if let Some(minutes) = dm_response_minutes {
                settings.response_time.direct_messages = minutes;
            }
            if let Some(frequency) = backup_frequency {
                settings.backup_frequency = frequency;
            }
            if let Some(enabled) = notifications {
                settings.enable_notifications = enabled;
            }
            let message = service
                .update_settings(&settings)
                .await
                .context("failed to save settings")?;
            println!("{message}");
        }
        SettingsCommands::Test { target } => {
            let message = service
                .test_connection(target)
                .await
                .with_context(|| format!("connection test for {target} failed"))?;
            println!("{message}");
        }
    }
    Ok(())
}

fn derive(config: &AppConfig, overrides: &[(String, i64)], interests: &[String]) -> Result<()> {
    let mut sliders: SliderSet = config.personality.sliders;
    for (name, value) in overrides {
        sliders = set_slider(&sliders, name, *value)?;
    }
    let interests = if interests.is_empty() {
        config.personality.interest_set()
    } else {
        interests.iter().cloned().collect()
    };

    let resolved = resolve_config(&sliders, &interests);
    println!("{}", serde_json::to_string_pretty(&resolved)?);
    Ok(())
}

async fn generate(service: Arc<dyn ContentService>, config: &AppConfig, args: GenerateArgs) -> Result<()> {
    let mut request = config.content.request(args.topic);
    if let Some(content_type) = args.content_type {
        request.content_type = content_type;
    }
    if let Some(tone) = args.tone {
        request.tone = tone;
    }
    if let Some(word_count) = args.word_count {
        request.word_count = word_count;
    }
    request.include_hashtags |= args.hashtags;

    let handle = WorkflowHandle::new(service, config.service.request_timeout());
    let item = handle.generate(&request).await.context("generation failed")?;
    println!("{}", item.text);

    let wants_schedule = args.schedule_date.is_some() || args.schedule_time.is_some();
    if !args.save && !wants_schedule {
        return Ok(());
    }

    handle.open_preview().await?;
    if args.save {
        let saved = handle.save().await.context("save failed")?;
        println!("Saved ({})", saved.id.as_deref().unwrap_or("no id"));
    } else {
        let schedule = ScheduleRequest {
            date: args.schedule_date,
            time: args.schedule_time,
        };
        let scheduled = handle.schedule(&schedule).await.context("schedule failed")?;
        println!(
            "Scheduled {} for {}",
            scheduled.id.as_deref().unwrap_or("item"),
            scheduled
                .scheduled_for
                .map(|t| t.to_string())
                .unwrap_or_default()
        );
    }
    Ok(())
}

async fn personality(service: &dyn ContentService, config: &AppConfig, action: PersonalityCommands) -> Result<()> {
    match action {
        PersonalityCommands::Show => {
            let document = service
                .get_personality_config()
                .await
                .context("failed to load personality")?;
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
        PersonalityCommands::Respond { prompt } => {
            let response = service
                .generate_personality_response(&prompt)
                .await
                .context("failed to generate response")?;
            println!("{response}");
        }
        PersonalityCommands::UpdateSliders {
            sliders,
            toggles,
            dry_run,
        } => {
            let mut editor = PersonalityEditor::load(service, &config.personality.sliders)
                .await
                .context("failed to load personality")?;
            for (name, value) in &sliders {
                editor.set_slider(name, *value)?;
            }
            for tag in &toggles {
                editor.toggle_interest(tag);
            }

            if dry_run {
                println!("{}", serde_json::to_string_pretty(&editor.to_document())?);
            } else {
                let message = editor
                    .publish(service)
                    .await
                    .context("failed to publish personality")?;
                println!("{message}");
            }
        }
    }
    Ok(())
}
