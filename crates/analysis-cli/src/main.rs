//! ratio-analyzer: score financial statements against the BCEAO grid.
//!
//! Usage:
//!   ratio-analyzer analyze bilan.json --sector commerce_detail --source excel
//!   ratio-analyzer batch data/*.json --concurrency 8 --source api
//!   ratio-analyzer sectors

use std::path::{Path, PathBuf};
use std::sync::Arc;

use analysis_orchestrator::{AnalysisRequest, AnalyzerConfig, FinancialAnalyzer};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use sector_benchmark::Sector;
use serde_json::json;
use statement_core::{AnalysisResult, SourceType, StatementRecord};
use tokio::sync::Semaphore;

const DEFAULT_CONCURRENCY: usize = 4;

#[derive(Parser, Debug)]
#[command(name = "ratio-analyzer", version, about = "Financial ratio analysis and BCEAO scoring")]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    /// Sector benchmark table overriding the built-in references
    #[arg(long, global = true, env = "ANALYZER_BENCHMARKS_PATH")]
    benchmarks: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze one statement record (JSON) and print the full result
    Analyze {
        file: PathBuf,

        /// Sector tag used for benchmarking
        #[arg(long)]
        sector: Option<String>,

        #[arg(long, value_enum, default_value_t = Source::Manual)]
        source: Source,

        /// Company name recorded in the metadata
        #[arg(long)]
        company: Option<String>,
    },
    /// Analyze several records concurrently, one JSON line per file
    Batch {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[arg(long)]
        sector: Option<String>,

        #[arg(long, value_enum, default_value_t = Source::Manual)]
        source: Source,

        /// Company name recorded in every result's metadata
        #[arg(long)]
        company: Option<String>,

        #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
        concurrency: usize,
    },
    /// List sectors and their benchmark bands
    Sectors,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Source {
    Excel,
    Manual,
    Api,
}

/// Request shared by both subcommands.
fn build_request(source: Source, sector: Option<String>, company: Option<String>) -> AnalysisRequest {
    let mut request = AnalysisRequest::new(source.into());
    request.sector = sector;
    request.company_name = company;
    request
}

impl From<Source> for SourceType {
    fn from(source: Source) -> Self {
        match source {
            Source::Excel => SourceType::ExcelImport,
            Source::Manual => SourceType::ManualEntry,
            Source::Api => SourceType::Api,
        }
    }
}

fn init_tracing(json_logs: bool) {
    let filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "ratio_analyzer=info,analysis_orchestrator=info".into())
    };
    if json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let mut config = AnalyzerConfig::from_env().context("Invalid analyzer configuration")?;
    if cli.benchmarks.is_some() {
        config.benchmarks_path = cli.benchmarks;
    }
    let analyzer = FinancialAnalyzer::new(config).context("Failed to build analyzer")?;

    match cli.command {
        Command::Analyze {
            file,
            sector,
            source,
            company,
        } => {
            let request = build_request(source, sector, company);
            let result = analyze_file(&analyzer, &file, request).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Batch {
            files,
            sector,
            source,
            company,
            concurrency,
        } => {
            let request = build_request(source, sector, company);
            run_batch(analyzer, files, request, concurrency).await?
        }
        Command::Sectors => print_sectors(&analyzer)?,
    }

    Ok(())
}

async fn analyze_file(
    analyzer: &FinancialAnalyzer,
    path: &Path,
    request: AnalysisRequest,
) -> Result<AnalysisResult> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let record = StatementRecord::from_json_str(&json)
        .with_context(|| format!("Invalid statement record in {}", path.display()))?;
    Ok(analyzer.analyze(record, request))
}

async fn run_batch(
    analyzer: FinancialAnalyzer,
    files: Vec<PathBuf>,
    request: AnalysisRequest,
    concurrency: usize,
) -> Result<()> {
    let total = files.len();
    let concurrency = concurrency.max(1);
    tracing::info!("Batch: {} files, concurrency={}", total, concurrency);

    let analyzer = Arc::new(analyzer);
    let semaphore = Arc::new(Semaphore::new(concurrency));
    let mut handles = Vec::with_capacity(total);

    for file in files {
        let analyzer = Arc::clone(&analyzer);
        let semaphore = Arc::clone(&semaphore);
        let request = request.clone();

        handles.push(tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await?;
            let result = analyze_file(&analyzer, &file, request).await;
            anyhow::Ok((file, result))
        }));
    }

    let mut failed = 0usize;
    for (done, handle) in handles.into_iter().enumerate() {
        let (file, result) = handle.await??;
        let line = match result {
            Ok(result) => {
                tracing::info!(
                    "[{}/{}] {} => {} ({})",
                    done + 1,
                    total,
                    file.display(),
                    result.classification.grade,
                    result.scores.global
                );
                json!({ "file": file.display().to_string(), "result": result })
            }
            Err(e) => {
                failed += 1;
                tracing::warn!("[{}/{}] {} failed: {:#}", done + 1, total, file.display(), e);
                json!({ "file": file.display().to_string(), "error": format!("{e:#}") })
            }
        };
        println!("{}", serde_json::to_string(&line)?);
    }

    tracing::info!("Done! {} files ({} failed)", total, failed);
    if failed > 0 {
        anyhow::bail!("{failed} of {total} files could not be analyzed");
    }
    Ok(())
}

fn print_sectors(analyzer: &FinancialAnalyzer) -> Result<()> {
    let sectors: Vec<_> = analyzer
        .benchmarks()
        .table()
        .sectors()
        .map(|(name, bands)| {
            let label = name.parse::<Sector>().ok().map(|s| s.label());
            json!({ "sector": name, "label": label, "benchmarks": bands })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&sectors)?);
    Ok(())
}
