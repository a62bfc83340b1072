//! # Folio CLI
//!
//! Usage:
//!   folio report.json -o report.pdf
//!   folio a.json b.json --out-dir reports/ --theme ocean
//!   cat report.json | folio -o report.pdf
//!   folio --example > report.json

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use folio::model::Report;
use folio::{ReportError, RenderOptions, Theme};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about = "Render equity research reports to navigable PDF", long_about = None)]
struct Cli {
    /// Report JSON files; reads stdin when none are given
    inputs: Vec<PathBuf>,

    /// Output PDF file (single report only)
    #[arg(short, long, conflicts_with = "out_dir")]
    output: Option<PathBuf>,

    /// Directory for Report-<TICKER>.pdf files
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Color theme; overrides the options file
    #[arg(short, long)]
    theme: Option<String>,

    /// Render options JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print a sample report and exit
    #[arg(long)]
    example: bool,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("✗ {e:#}");
        if let Some(hint) = e.chain().find_map(|c| c.downcast_ref::<ReportError>()).and_then(ReportError::hint) {
            eprintln!("  hint: {hint}");
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.example {
        print!("{}", example_report_json());
        return Ok(());
    }

    let mut options = match &cli.config {
        Some(path) => {
            let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            RenderOptions::from_json(&json).with_context(|| format!("loading {}", path.display()))?
        }
        None => RenderOptions::default(),
    };
    if let Some(name) = &cli.theme {
        options.theme = Theme::from_name(name);
    }

    if cli.output.is_some() && cli.inputs.len() > 1 {
        bail!("--output takes a single report; use --out-dir for several");
    }

    if cli.inputs.is_empty() {
        let mut json = String::new();
        io::stdin().read_to_string(&mut json).context("reading stdin")?;
        return render_one(&json, "stdin", &cli, &options);
    }

    for input in &cli.inputs {
        let json = fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
        render_one(&json, &input.display().to_string(), &cli, &options)?;
    }
    Ok(())
}

fn render_one(json: &str, source: &str, cli: &Cli, options: &RenderOptions) -> Result<()> {
    let report = Report::from_json(json).with_context(|| format!("parsing {source}"))?;
    let bytes = folio::render_report(&report, options).with_context(|| format!("rendering {source}"))?;

    let output = match &cli.output {
        Some(path) => path.clone(),
        None => {
            let dir = cli.out_dir.as_deref().unwrap_or_else(|| Path::new("."));
            fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
            dir.join(output_file_name(&report.cover_page_data.ticker))
        }
    };
    fs::write(&output, &bytes).with_context(|| format!("writing {}", output.display()))?;
    eprintln!("✓ Written {} bytes to {}", bytes.len(), output.display());
    Ok(())
}

/// `Report-<TICKER>.pdf`, keeping only characters that are safe in a file name.
fn output_file_name(ticker: &str) -> String {
    let safe: String = ticker
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    if safe.is_empty() {
        "Report.pdf".to_string()
    } else {
        format!("Report-{safe}.pdf")
    }
}

fn example_report_json() -> &'static str {
    r###"{
  "id": 1,
  "coverPageData": {
    "companyName": "Northwind Robotics",
    "ticker": "NWRB",
    "reportTitle": "Initiating Coverage",
    "reportDate": "2024-05-01",
    "priceTarget": { "worst": "$38.00", "base": "$52.00", "best": "$71.00" },
    "potentialUpside": "18.2%",
    "currentPrice": "$44.00",
    "marketCap": "12400000000",
    "industryCategory": "Industrial Automation"
  },
  "reportContent": "## 1. Investment Summary\n\n**Bottom line:** Northwind is the low-cost supplier of warehouse picking arms, and its service attach rate is rising.\n\n* Installed base grew 41% year over year.\n* Service revenue now covers fixed costs.\n\n### 1.1 Valuation\n\n| Metric | FY23 | FY24E | FY25E |\n|---|---|---|---|\n| Revenue | 1,120 | 1,480 | 1,910 |\n| Operating income | -35 | 62 | 188 |\n| EPS | -0.21 | 0.38 | 1.12 |\nFigures in USD millions except EPS.\n\n## 2. Key Risks\n\n| Risk | Impact | Mitigation |\n|---|---|---|\n| Customer concentration | Top three customers are 44% of revenue | Multi-year contracts with volume floors |\n| Component supply | Servo shortages delay shipments | Second source qualified in 2023 |\n\n## Appendix\n\n### A.1 Segment Data\n\n| Segment | FY23 | FY24E |\n|---|---|---|\n| Hardware | 860 | 1,090 |\n| Services | 260 | 390 |\n"
}
"###
}
