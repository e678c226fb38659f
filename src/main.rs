//! Symptom checker CLI
//!
//! Predicts a disease from a list of symptoms with a bundled ONNX classifier.

use clap::{Parser, Subcommand};
use symcheck::{Config, Result};

#[derive(Parser)]
#[command(name = "symcheck")]
#[command(about = "Disease prediction from selected symptoms", long_about = None)]
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
    /// Predict a disease from symptoms
    Predict {
        /// Symptoms, e.g. "high fever" joint_pain
        #[arg(required = true)]
        symptoms: Vec<String>,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// List the symptom vocabulary
    Symptoms,
    /// List the disease labels
    Labels,
    /// Show model and asset information
    Info,
    /// Write a default config file
    Init,
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
        Commands::Predict { symptoms, format } => commands::predict(&config, &symptoms, format),
        Commands::Symptoms => commands::symptoms(&config),
        Commands::Labels => commands::labels(&config),
        Commands::Info => commands::info(&config),
        Commands::Init => commands::init(&cli.config),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use symcheck::data::{DirAssets, LabelVocabulary, SymptomVocabulary};
    use symcheck::model::{InferenceEngine, OnnxEngine};
    use symcheck::predict::inference::format_prediction;
    use symcheck::{PredictError, Prediction, Predictor, PredictorState};

    fn load_predictor(config: &Config) -> Predictor<OnnxEngine> {
        let assets = DirAssets::new(&config.assets.dir);
        Predictor::initialize(&assets, &config.assets, |bytes| {
            OnnxEngine::from_bytes(bytes, &config.engine)
        })
    }

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        std::fs::create_dir_all(&config.assets.dir)?;
        println!("Created {}/ directory", config.assets.dir);

        println!("\nNext steps:");
        println!("  1. Copy {} into {}/", config.assets.model_file, config.assets.dir);
        println!(
            "  2. Copy {} and {} into {}/",
            config.assets.symptoms_file, config.assets.labels_file, config.assets.dir
        );
        println!("  3. Run 'symcheck predict fever headache' to make a prediction");

        Ok(())
    }

    /// Failures are returned, not printed; `main` reports them once on stderr
    pub fn predict(config: &Config, symptoms: &[String], format: OutputFormat) -> Result<()> {
        let predictor = load_predictor(config);
        let outcome = predictor.try_predict(symptoms);
        predictor.shutdown();

        let prediction = outcome?;
        print!("{}", render(&prediction, &format)?);
        Ok(())
    }

    pub fn render(prediction: &Prediction, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Table => Ok(format_prediction(prediction)),
            OutputFormat::Json => serde_json::to_string_pretty(prediction)
                .map(|text| format!("{}\n", text))
                .map_err(|e| PredictError::Config(e.to_string())),
            OutputFormat::Csv => Ok(format!(
                "label,index,ignored\n{},{},{}\n",
                csv_field(&prediction.label),
                prediction.index,
                csv_field(&prediction.ignored_symptoms.join(";"))
            )),
        }
    }

    /// Quote a CSV field when it holds a separator, quote or line break
    pub fn csv_field(value: &str) -> String {
        if value.contains([',', '"', '\n', '\r']) {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        }
    }

    pub fn symptoms(config: &Config) -> Result<()> {
        let assets = DirAssets::new(&config.assets.dir);
        let vocab = SymptomVocabulary::load(&assets, &config.assets.symptoms_file);

        if vocab.is_empty() {
            println!("No symptoms loaded from {}", assets.path_of(&config.assets.symptoms_file).display());
            return Ok(());
        }

        for (i, symptom) in vocab.iter().enumerate() {
            println!("{:>4}  {}", i, symptom);
        }
        Ok(())
    }

    pub fn labels(config: &Config) -> Result<()> {
        let assets = DirAssets::new(&config.assets.dir);
        let labels = LabelVocabulary::load(&assets, &config.assets.labels_file);

        if labels.is_empty() {
            println!("No labels loaded from {}", assets.path_of(&config.assets.labels_file).display());
            return Ok(());
        }

        for (i, label) in labels.iter().enumerate() {
            println!("{:>4}  {}", i, label);
        }
        Ok(())
    }

    pub fn info(config: &Config) -> Result<()> {
        let assets = DirAssets::new(&config.assets.dir);
        let predictor = load_predictor(config);

        println!("Model Information");
        println!("───────────────────────────────");
        println!("  Assets:    {}", assets.root().display());
        println!("  Model:     {}", config.assets.model_path().display());
        println!("  Symptoms:  {}", predictor.symptoms().len());
        println!("  Labels:    {}", predictor.labels().len());

        match predictor.state() {
            PredictorState::Ready => println!("  State:     ready"),
            PredictorState::Uninitialized => println!("  State:     uninitialized"),
            PredictorState::InitializationFailed(reason) => {
                println!("  State:     failed ({})", reason)
            }
        }

        if let Some(engine) = predictor.engine() {
            println!("  Inputs:    {}", engine.input_names().join(", "));
            println!("  Outputs:   {}", engine.output_names().join(", "));
        }

        predictor.shutdown();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::commands::{csv_field, render};
    use super::OutputFormat;
    use symcheck::Prediction;

    fn prediction(label: &str, ignored: &[&str]) -> Prediction {
        Prediction {
            label: label.to_string(),
            index: 3,
            known_symptoms: vec!["fever".to_string()],
            ignored_symptoms: ignored.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_csv_field_escaping() {
        assert_eq!(csv_field("Dengue"), "Dengue");
        assert_eq!(csv_field("Hepatitis A, B"), "\"Hepatitis A, B\"");
        assert_eq!(csv_field("so-called \"flu\""), "\"so-called \"\"flu\"\"\"");
    }

    #[test]
    fn test_render_csv_quotes_fields() {
        let text = render(&prediction("Allergy, seasonal", &["a,b", "rash"]), &OutputFormat::Csv).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "label,index,ignored");
        assert_eq!(lines[1], "\"Allergy, seasonal\",3,\"a,b;rash\"");
    }

    #[test]
    fn test_render_json() {
        let text = render(&prediction("Dengue", &[]), &OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["label"], "Dengue");
        assert_eq!(value["index"], 3);
    }

    #[test]
    fn test_render_table() {
        let text = render(&prediction("Dengue", &[]), &OutputFormat::Table).unwrap();
        assert!(text.contains("Dengue"));
    }
}
