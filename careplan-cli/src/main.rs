//! careplan CLI - patient risk assessment and model evaluation reports

#![deny(warnings)]

// Global invariants enforced:
// - Input is validated before it reaches the scoring engine
// - Deterministic output for a pinned seed

use anyhow::Context;
use careplan_core::config::{self, ResolvedConfig, MAX_DISPLAY_DELAY_MS};
use careplan_core::dashboard::{self, FeatureCategory, FeatureFilter};
use careplan_core::export;
use careplan_core::input::FormValue;
use careplan_core::{assess, render_json, render_text, AssessOptions, PatientForm};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "careplan")]
#[command(about = "Rule-based clinical recommendations and model evaluation metrics")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score patient vitals and print a recommendation
    Assess {
        /// JSON intake form; individual flags override its fields
        #[arg(long)]
        input: Option<PathBuf>,

        #[command(flatten)]
        vitals: VitalsArgs,

        /// Output format (overrides config file)
        #[arg(long)]
        format: Option<OutputFormat>,

        /// Pin the confidence jitter (overrides config file)
        #[arg(long)]
        seed: Option<u64>,

        /// Simulated processing delay in milliseconds (overrides config file)
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Show the model comparison table
    Models {
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
    /// Show feature importances
    Features {
        /// Only show one category (e.g. "vital-signs", "Lifestyle")
        #[arg(long)]
        category: Option<String>,

        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
    /// Show the recommendation class distribution
    Distribution {
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
    /// Show the confusion matrix of the best model
    Confusion {
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
    /// Export the evaluation dataset to a file
    Export {
        /// What to export
        #[arg(long, default_value = "csv")]
        kind: ExportKind,

        /// Output file path (default: healthcare_dashboard_data.csv or healthcare_project_summary.txt)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Validate or show configuration
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Raw vitals as typed on the command line; validated by `PatientForm`
#[derive(Args, Default)]
struct VitalsArgs {
    /// Age in years
    #[arg(long, allow_hyphen_values = true)]
    age: Option<String>,

    /// Systolic blood pressure (mmHg)
    #[arg(long, allow_hyphen_values = true)]
    systolic: Option<String>,

    /// Diastolic blood pressure (mmHg)
    #[arg(long, allow_hyphen_values = true)]
    diastolic: Option<String>,

    /// Total cholesterol (mg/dL)
    #[arg(long, allow_hyphen_values = true)]
    cholesterol: Option<String>,

    /// Fasting glucose (mg/dL)
    #[arg(long, allow_hyphen_values = true)]
    glucose: Option<String>,

    /// Resting heart rate (bpm)
    #[arg(long, allow_hyphen_values = true)]
    heart_rate: Option<String>,

    /// Body mass index
    #[arg(long, allow_hyphen_values = true)]
    bmi: Option<String>,

    /// never | former | current
    #[arg(long)]
    smoking: Option<String>,

    /// sedentary | moderate | active
    #[arg(long)]
    exercise: Option<String>,

    /// low | moderate | high
    #[arg(long)]
    stress: Option<String>,
}

impl VitalsArgs {
    /// Overlay any flags that were given onto `form`
    fn apply_to(self, form: &mut PatientForm) {
        let overlay = |slot: &mut Option<FormValue>, value: Option<String>| {
            if let Some(v) = value {
                *slot = Some(FormValue::from(v));
            }
        };
        overlay(&mut form.age, self.age);
        overlay(&mut form.systolic_bp, self.systolic);
        overlay(&mut form.diastolic_bp, self.diastolic);
        overlay(&mut form.cholesterol, self.cholesterol);
        overlay(&mut form.glucose, self.glucose);
        overlay(&mut form.heart_rate, self.heart_rate);
        overlay(&mut form.bmi, self.bmi);
        overlay(&mut form.smoking_status, self.smoking);
        overlay(&mut form.exercise_level, self.exercise);
        overlay(&mut form.stress_level, self.stress);
    }
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file
    Validate {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show the resolved configuration (merged defaults + config file)
    Show {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, PartialEq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl From<config::OutputFormat> for OutputFormat {
    fn from(format: config::OutputFormat) -> Self {
        match format {
            config::OutputFormat::Text => OutputFormat::Text,
            config::OutputFormat::Json => OutputFormat::Json,
        }
    }
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum ExportKind {
    Csv,
    Summary,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Assess {
            input,
            vitals,
            format,
            seed,
            delay_ms,
            config: config_path,
        } => {
            let cwd = std::env::current_dir()?;
            let resolved = config::load_and_resolve(&cwd, config_path.as_deref())
                .context("failed to load configuration")?;
            if let Some(path) = &resolved.config_path {
                tracing::info!(path = %path.display(), "using config");
            }

            // CLI flags override config file values
            let effective_format = format.unwrap_or_else(|| resolved.format.into());
            let effective_seed = seed.or(resolved.seed);
            let effective_delay = delay_ms.unwrap_or(resolved.display_delay_ms);
            if effective_delay > MAX_DISPLAY_DELAY_MS {
                anyhow::bail!(
                    "--delay-ms must be at most {} (got {})",
                    MAX_DISPLAY_DELAY_MS,
                    effective_delay
                );
            }

            let mut form = match &input {
                Some(path) => load_form(path)?,
                None => PatientForm::default(),
            };
            vitals.apply_to(&mut form);

            let options = AssessOptions {
                seed: effective_seed,
            };
            let result = assess(&form, &options).context("invalid patient input")?;

            if effective_delay > 0 {
                tracing::debug!(delay_ms = effective_delay, "simulating processing delay");
                std::thread::sleep(Duration::from_millis(effective_delay));
            }

            match effective_format {
                OutputFormat::Text => print!("{}", render_text(&result)),
                OutputFormat::Json => println!("{}", render_json(&result)),
            }
        }
        Commands::Models { format } => {
            let data = dashboard::dashboard();
            match format {
                OutputFormat::Text => print!("{}", dashboard::render_models_text(data)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(data.models)?),
            }
        }
        Commands::Features { category, format } => {
            let filter = match category {
                Some(name) => FeatureFilter::Category(name.parse::<FeatureCategory>()?),
                None => FeatureFilter::All,
            };
            let data = dashboard::dashboard();
            match format {
                OutputFormat::Text => print!("{}", dashboard::render_features_text(data, filter)),
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&data.features_in(filter))?)
                }
            }
        }
        Commands::Distribution { format } => {
            let data = dashboard::dashboard();
            match format {
                OutputFormat::Text => print!("{}", dashboard::render_distribution_text(data)),
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(data.recommendations)?)
                }
            }
        }
        Commands::Confusion { format } => {
            let matrix = &dashboard::dashboard().confusion_matrix;
            match format {
                OutputFormat::Text => print!("{}", dashboard::render_confusion_text(matrix)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(matrix)?),
            }
        }
        Commands::Export { kind, output } => {
            let data = dashboard::dashboard();
            let (contents, default_name) = match kind {
                ExportKind::Csv => (export::render_csv(data), export::CSV_FILE_NAME),
                ExportKind::Summary => {
                    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
                    (
                        export::render_summary(data, &generated_at),
                        export::SUMMARY_FILE_NAME,
                    )
                }
            };
            let output_path = output.unwrap_or_else(|| PathBuf::from(default_name));
            export::write_export(&output_path, &contents)?;
            eprintln!("Export written to: {}", output_path.display());
        }
        Commands::Config { action } => match action {
            ConfigAction::Validate { path } => {
                let cwd = std::env::current_dir()?;
                match config::load_and_resolve(&cwd, path.as_deref()) {
                    Ok(resolved) => {
                        if let Some(ref p) = resolved.config_path {
                            println!("Config valid: {}", p.display());
                        } else {
                            println!("No config file found. Using defaults.");
                        }
                    }
                    Err(e) => {
                        eprintln!("Config validation failed: {:#}", e);
                        std::process::exit(1);
                    }
                }
            }
            ConfigAction::Show { path } => {
                let cwd = std::env::current_dir()?;
                let resolved = config::load_and_resolve(&cwd, path.as_deref())
                    .context("failed to load configuration")?;
                print!("{}", describe_config(&resolved));
            }
        },
    }

    Ok(())
}

/// Read a JSON intake form
fn load_form(path: &Path) -> anyhow::Result<PatientForm> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read input form: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse input form: {}", path.display()))
}

fn describe_config(resolved: &ResolvedConfig) -> String {
    let mut out = String::from("Configuration:\n");
    match &resolved.config_path {
        Some(p) => out.push_str(&format!("  Source: {}\n", p.display())),
        None => out.push_str("  Source: defaults (no config file found)\n"),
    }
    out.push('\n');
    out.push_str(&format!(
        "  seed: {}\n",
        resolved
            .seed
            .map(|s| s.to_string())
            .unwrap_or_else(|| "none (fresh entropy)".to_string())
    ));
    out.push_str(&format!("  display_delay_ms: {}\n", resolved.display_delay_ms));
    out.push_str(&format!(
        "  format: {}\n",
        match resolved.format {
            config::OutputFormat::Text => "text",
            config::OutputFormat::Json => "json",
        }
    ));
    out
}
