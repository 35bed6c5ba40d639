use clap::Parser;
use cutlist_pro::core::manifest::{self, LintLevel};
use cutlist_pro::utils::logger;

#[derive(Parser)]
#[command(name = "manifest-lint")]
#[command(about = "Check a requirements manifest for invalid, duplicate and pending entries")]
struct Args {
    /// Path to the manifest
    path: String,

    /// Also print info-level findings
    #[arg(short, long)]
    verbose: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);
    tracing::debug!("📁 Linting {}", args.path);

    let parsed = match manifest::load_manifest(&args.path) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(2);
        }
    };
    tracing::debug!(
        "Parsed {} requirement(s), {} pending, {} invalid",
        parsed.requirements.len(),
        parsed.commented_out.len(),
        parsed.invalid.len()
    );

    let report = manifest::lint(&parsed);

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("❌ {}", e);
                std::process::exit(2);
            }
        }
    } else {
        for finding in &report.findings {
            if args.verbose || finding.level > LintLevel::Info {
                println!("{}", finding);
            }
        }
        println!(
            "{}: {} requirement(s), {} section(s), {} error(s), {} warning(s), {} info",
            args.path,
            report.requirement_count,
            report.section_count,
            report.count(LintLevel::Error),
            report.count(LintLevel::Warning),
            report.count(LintLevel::Info)
        );
    }

    if !report.passed() {
        std::process::exit(1);
    }
}
