//! Cricket Player Prediction CLI
//!
//! Predicts batsman effective runs and bowler effective wickets from trained
//! model artifacts.

use clap::{Parser, Subcommand};
use cricket::{Config, Result, Role};

#[derive(Parser)]
#[command(name = "cricket")]
#[command(about = "Batsman and bowler performance prediction", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict effective runs (batsman) or effective wickets (bowler)
    Predict {
        /// Prediction type: batsman or bowler
        #[arg(long = "type")]
        role: Role,
        /// Balls faced (batsman)
        #[arg(long = "balls_faced", alias = "balls-faced", allow_negative_numbers = true)]
        balls_faced: Option<String>,
        /// Strike rate (batsman)
        #[arg(long = "strike_rate", alias = "strike-rate", allow_negative_numbers = true)]
        strike_rate: Option<String>,
        /// Overs bowled (bowler)
        #[arg(long, allow_negative_numbers = true)]
        overs: Option<String>,
        /// Economy rate (bowler)
        #[arg(long, allow_negative_numbers = true)]
        economy: Option<String>,
        /// Dot ball percentage, 0-100
        #[arg(long = "dot_ball_pct", alias = "dot-ball-pct", allow_negative_numbers = true)]
        dot_ball_pct: String,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
        /// Use the heuristic when model artifacts are missing instead of failing
        #[arg(long)]
        allow_heuristic: bool,
    },
    /// Predict every row of a JSON file
    Batch {
        /// JSON array of {"type": ..., feature: value} objects
        file: String,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Model management commands
    Model {
        #[command(subcommand)]
        action: ModelCommands,
    },
    /// Initialize a new project with default config
    Init,
}

#[derive(Subcommand)]
enum ModelCommands {
    /// Show artifact locations and features
    Info,
    /// Load every bundle and report problems
    Validate,
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use table, json, or csv.", s)),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    let result = match cli.command {
        Commands::Predict {
            role,
            balls_faced,
            strike_rate,
            overs,
            economy,
            dot_ball_pct,
            format,
            allow_heuristic,
        } => commands::predict(
            &config,
            role,
            commands::RawArgs {
                balls_faced,
                strike_rate,
                overs,
                economy,
                dot_ball_pct,
            },
            format,
            allow_heuristic,
        ),
        Commands::Batch { file, format } => commands::batch(&config, &file, format),
        Commands::Model { action } => match action {
            ModelCommands::Info => commands::model_info(&config),
            ModelCommands::Validate => commands::model_validate(&config),
        },
        Commands::Init => commands::init(&cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use cricket::features::{BatsmanFeatures, BowlerFeatures, PlayerFeatures};
    use cricket::model::ModelBundle;
    use cricket::predict::{format_prediction, PredictionService};
    use cricket::{CricketError, Prediction};

    /// Feature flags exactly as typed on the command line
    pub struct RawArgs {
        pub balls_faced: Option<String>,
        pub strike_rate: Option<String>,
        pub overs: Option<String>,
        pub economy: Option<String>,
        pub dot_ball_pct: String,
    }

    impl RawArgs {
        fn features(&self, role: Role) -> Result<PlayerFeatures> {
            match role {
                Role::Batsman => {
                    let (Some(bf), Some(sr)) = (&self.balls_faced, &self.strike_rate) else {
                        return Err(CricketError::Usage(
                            "Batsman requires: --balls_faced --strike_rate --dot_ball_pct"
                                .to_string(),
                        ));
                    };
                    Ok(BatsmanFeatures::from_inputs(bf, sr, &self.dot_ball_pct)?.into())
                }
                Role::Bowler => {
                    let (Some(overs), Some(economy)) = (&self.overs, &self.economy) else {
                        return Err(CricketError::Usage(
                            "Bowler requires: --overs --economy --dot_ball_pct".to_string(),
                        ));
                    };
                    Ok(BowlerFeatures::from_inputs(overs, economy, &self.dot_ball_pct)?.into())
                }
            }
        }
    }

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        std::fs::create_dir_all(&config.models.dir)?;
        println!("Created {}/ directory", config.models.dir);

        println!("\nNext steps:");
        println!("  1. Edit {} to customize settings", config_path);
        println!(
            "  2. Export trained model and scaler artifacts into {}/",
            config.models.dir
        );
        println!("  3. Run 'cricket model validate' to check them");
        println!(
            "  4. Run 'cricket predict --type batsman --balls_faced 30 --strike_rate 150 --dot_ball_pct 25'"
        );

        Ok(())
    }

    pub fn predict(
        config: &Config,
        role: Role,
        args: RawArgs,
        format: OutputFormat,
        allow_heuristic: bool,
    ) -> Result<()> {
        let features = args.features(role)?;

        let mut service = PredictionService::from_config(&config.models);
        let prediction = if allow_heuristic || config.prediction.allow_heuristic {
            service.predict(features)
        } else {
            log::info!(
                "Loading {} model from {}",
                role,
                config.models.paths(role).model.display()
            );
            service.predict_strict(features)?
        };

        if prediction.is_heuristic() {
            log::warn!("No usable {} model, prediction uses the heuristic", role);
        }

        let precision = config.prediction.precision;
        match format {
            OutputFormat::Table => print!("{}", format_prediction(&prediction, precision)),
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "type": prediction.role,
                    "target": prediction.role.target(),
                    "value": prediction.value,
                    "source": prediction.source,
                });
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
            OutputFormat::Csv => {
                println!("type,target,value,source");
                println!(
                    "{},{},{:.prec$},{}",
                    prediction.role,
                    prediction.role.target(),
                    prediction.value,
                    prediction.source,
                    prec = precision
                );
            }
        }

        Ok(())
    }

    pub fn batch(config: &Config, file: &str, format: OutputFormat) -> Result<()> {
        let content = std::fs::read_to_string(file)?;
        let rows: Vec<serde_json::Value> = serde_json::from_str(&content)?;

        let mut service = PredictionService::from_config(&config.models);
        let results: Vec<(String, Result<Prediction>)> = rows
            .into_iter()
            .map(|row| {
                let label = match row.get("type") {
                    Some(serde_json::Value::String(t)) => t.clone(),
                    _ => "-".to_string(),
                };
                (label, service.predict_raw(row))
            })
            .collect();

        let precision = config.prediction.precision;
        match format {
            OutputFormat::Table => {
                println!("{:<5} {:<8} {:>12}  {}", "#", "type", "value", "source");
                println!("───────────────────────────────────────────");
                for (i, (label, result)) in results.iter().enumerate() {
                    match result {
                        Ok(p) => println!(
                            "{:<5} {:<8} {:>12.prec$}  {}",
                            i + 1,
                            p.role,
                            p.value,
                            p.source,
                            prec = precision
                        ),
                        Err(e) => println!("{:<5} {:<8} {:>12}  {}", i + 1, label, "-", e),
                    }
                }
            }
            OutputFormat::Json => {
                let items: Vec<serde_json::Value> = results
                    .iter()
                    .map(|(label, result)| match result {
                        Ok(p) => serde_json::json!({
                            "type": p.role,
                            "value": p.value,
                            "source": p.source,
                        }),
                        Err(e) => serde_json::json!({
                            "type": label,
                            "error": e.to_string(),
                        }),
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&items)?);
            }
            OutputFormat::Csv => {
                println!("type,value,source,error");
                for (label, result) in &results {
                    match result {
                        Ok(p) => println!(
                            "{},{:.prec$},{},",
                            p.role,
                            p.value,
                            p.source,
                            prec = precision
                        ),
                        Err(e) => println!("{},,,\"{}\"", label, e.to_string().replace('"', "'")),
                    }
                }
            }
        }

        let failed = results.iter().filter(|(_, r)| r.is_err()).count();
        let heuristic = results
            .iter()
            .filter(|(_, r)| matches!(r, Ok(p) if p.is_heuristic()))
            .count();
        log::info!(
            "Predicted {} rows ({} failed, {} via heuristic)",
            results.len(),
            failed,
            heuristic
        );

        Ok(())
    }

    pub fn model_info(config: &Config) -> Result<()> {
        let presence = |p: &std::path::Path| if p.exists() { "present" } else { "missing" };

        println!("Model Information");
        println!("───────────────────────────────");
        for role in Role::ALL {
            let paths = config.models.paths(role);
            println!("  {}", role);
            println!("    Features: {}", role.feature_names().join(", "));
            println!("    Target:   {}", role.target());
            println!(
                "    Model:    {} ({})",
                paths.model.display(),
                presence(paths.model.as_path())
            );
            println!(
                "    Scaler:   {} ({})",
                paths.scaler.display(),
                presence(paths.scaler.as_path())
            );
        }

        Ok(())
    }

    pub fn model_validate(config: &Config) -> Result<()> {
        let mut first_error = None;

        println!("Validating model artifacts");
        println!("───────────────────────────────");
        for role in Role::ALL {
            match ModelBundle::load(role, &config.models.paths(role)) {
                Ok(bundle) => println!("  {:<8} OK      {}", role, bundle.describe()),
                Err(e) => {
                    println!("  {:<8} FAILED  {}", role, e);
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commands::RawArgs;
    use cricket::{CricketError, ModelsConfig};

    fn raw(
        balls_faced: Option<&str>,
        strike_rate: Option<&str>,
        overs: Option<&str>,
        economy: Option<&str>,
        dot_ball_pct: &str,
    ) -> RawArgs {
        RawArgs {
            balls_faced: balls_faced.map(String::from),
            strike_rate: strike_rate.map(String::from),
            overs: overs.map(String::from),
            economy: economy.map(String::from),
            dot_ball_pct: dot_ball_pct.to_string(),
        }
    }

    fn config_in(dir: &std::path::Path) -> Config {
        Config {
            models: ModelsConfig {
                dir: dir.to_string_lossy().into_owned(),
                ..ModelsConfig::default()
            },
            ..Config::default()
        }
    }

    #[test]
    fn test_parse_negative_values() {
        let cli = Cli::try_parse_from([
            "cricket",
            "predict",
            "--type",
            "bowler",
            "--overs",
            "4",
            "--economy",
            "-1",
            "--dot_ball_pct",
            "-2.5",
            "--allow-heuristic",
        ])
        .unwrap();

        match cli.command {
            Commands::Predict {
                role,
                economy,
                dot_ball_pct,
                allow_heuristic,
                ..
            } => {
                assert_eq!(role, Role::Bowler);
                assert_eq!(economy.as_deref(), Some("-1"));
                assert_eq!(dot_ball_pct, "-2.5");
                assert!(allow_heuristic);
            }
            _ => panic!("expected predict command"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_role() {
        let parsed = Cli::try_parse_from([
            "cricket",
            "predict",
            "--type",
            "keeper",
            "--dot_ball_pct",
            "40",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_role_flags_required() {
        let err = commands::predict(
            &Config::default(),
            Role::Batsman,
            raw(Some("30"), None, None, None, "25"),
            OutputFormat::Table,
            true,
        )
        .unwrap_err();
        match err {
            CricketError::Usage(msg) => assert!(msg.starts_with("Batsman requires")),
            other => panic!("unexpected error: {:?}", other),
        }

        let err = commands::predict(
            &Config::default(),
            Role::Bowler,
            raw(Some("30"), Some("150"), Some("4"), None, "40"),
            OutputFormat::Table,
            true,
        )
        .unwrap_err();
        assert!(matches!(err, CricketError::Usage(_)));
        assert!(err.to_string().starts_with("Bowler requires"));
    }

    #[test]
    fn test_non_numeric_flag_is_invalid_input() {
        let err = commands::predict(
            &Config::default(),
            Role::Bowler,
            raw(None, None, Some("4"), Some("tight"), "40"),
            OutputFormat::Json,
            true,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CricketError::InvalidInput {
                field: "economy",
                ..
            }
        ));
    }

    #[test]
    fn test_strict_predict_without_artifacts_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        let err = commands::predict(
            &config,
            Role::Bowler,
            raw(None, None, Some("4"), Some("7.5"), "40"),
            OutputFormat::Table,
            false,
        )
        .unwrap_err();

        let expected = dir.path().join("bowler_model.json");
        assert!(matches!(
            &err,
            CricketError::NoModel { kind: "model", path, .. } if *path == expected
        ));
        assert!(err.to_string().contains(&expected.display().to_string()));
    }

    #[test]
    fn test_allow_heuristic_predicts_without_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());

        commands::predict(
            &config,
            Role::Bowler,
            raw(None, None, Some("4"), Some("-1"), "40"),
            OutputFormat::Csv,
            true,
        )
        .unwrap();

        // Same switch from the config file
        config.prediction.allow_heuristic = true;
        commands::predict(
            &config,
            Role::Batsman,
            raw(Some("30"), Some("150"), None, None, "25"),
            OutputFormat::Table,
            false,
        )
        .unwrap();
    }

    #[test]
    fn test_batch_reports_bad_rows_without_aborting() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let file = dir.path().join("rows.json");
        std::fs::write(
            &file,
            r#"[
                {"type": "batsman", "balls_faced": 30, "strike_rate": 150, "dot_ball_pct": 25},
                {"type": "keeper", "balls_faced": 10},
                {"overs": 4},
                {"type": "bowler", "overs": 4, "economy": "n/a", "dot_ball_pct": 40}
            ]"#,
        )
        .unwrap();

        for format in [OutputFormat::Table, OutputFormat::Json, OutputFormat::Csv] {
            commands::batch(&config, file.to_str().unwrap(), format).unwrap();
        }
    }

    #[test]
    fn test_batch_requires_array() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("rows.json");
        std::fs::write(&file, r#"{"type": "batsman"}"#).unwrap();

        let config = config_in(dir.path());
        let err = commands::batch(&config, file.to_str().unwrap(), OutputFormat::Table).unwrap_err();
        assert!(matches!(err, CricketError::Json(_)));
    }

    #[test]
    fn test_model_validate_fails_without_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let err = commands::model_validate(&config_in(dir.path())).unwrap_err();
        assert!(matches!(err, CricketError::Artifact(_)));
    }
}
