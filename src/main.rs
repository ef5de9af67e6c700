use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::process;

use clap::Parser;
use tracing::Level;

use dump_conv::dialect::Dialect;
use dump_conv::error::TranspileError;
use dump_conv::rule::RuleSet;
use dump_conv::transpiler::DumpTranspiler;

/// SQL Dump Converter - rewrites database dumps line by line for another dialect
#[derive(Parser)]
#[command(name = "dump-conv", version)]
#[command(about = "Convert SQL dumps between database dialects")]
struct Cli {
    /// Path to the source dump (stdin when omitted or "-")
    source_file: Option<String>,

    /// Source dialect
    #[arg(short = 'f', long, default_value = "postgresql")]
    from: String,

    /// Target dialect
    #[arg(short = 't', long, default_value = "mysql")]
    to: String,

    /// Output file (if not specified, prints to console)
    #[arg(short = 'o', long)]
    output: Option<String>,

    /// Also drop lines whose trimmed text starts with PREFIX
    #[arg(long = "drop-prefix", value_name = "PREFIX")]
    drop_prefix: Vec<String>,

    /// Also drop lines containing TEXT
    #[arg(long = "drop-containing", value_name = "TEXT")]
    drop_containing: Vec<String>,

    /// Also delete every match of REGEX
    #[arg(long, value_name = "REGEX")]
    strip: Vec<String>,

    /// Also replace literal text, written as FROM=TO
    #[arg(long, value_name = "FROM=TO")]
    replace: Vec<String>,

    /// Print the rule table for the dialect pair and exit
    #[arg(long)]
    list_rules: bool,

    /// Log level
    #[arg(
        long,
        default_value = "warn",
        value_parser = ["error", "warn", "info", "debug", "trace"]
    )]
    log_level: String,
}

fn setup_logging(verbosity: &str) {
    let level = match verbosity {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    // stdout may carry the converted dump
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn extra_rules(cli: &Cli) -> Result<RuleSet, TranspileError> {
    let mut rules = RuleSet::new();
    for prefix in &cli.drop_prefix {
        rules = rules.try_drop_prefix(prefix)?;
    }
    for marker in &cli.drop_containing {
        rules = rules.try_drop_containing(marker)?;
    }
    for pattern in &cli.strip {
        rules = rules.strip_pattern(pattern)?;
    }
    for spec in &cli.replace {
        rules = rules.replace_spec(spec)?;
    }
    Ok(rules)
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn main() {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    // Parse dialect names
    let from_dialect: Dialect = cli.from.parse().unwrap_or_else(|e| fail(e));
    let to_dialect: Dialect = cli.to.parse().unwrap_or_else(|e| fail(e));

    let rules = extra_rules(&cli).unwrap_or_else(|e| fail(e));
    let transpiler = DumpTranspiler::new().with_extra_rules(rules);

    if cli.list_rules {
        let rule_set = transpiler
            .rule_set(from_dialect, to_dialect)
            .unwrap_or_else(|e| fail(e));
        println!("{} -> {}", from_dialect, to_dialect);
        for (i, rule) in rule_set.rules().iter().enumerate() {
            println!("{:>3}. {}", i + 1, rule);
        }
        return;
    }

    // Open source dump
    let reader: Box<dyn io::BufRead> = match cli.source_file.as_deref() {
        None | Some("-") => Box::new(io::stdin().lock()),
        Some(path) => match File::open(path) {
            Ok(file) => Box::new(BufReader::new(file)),
            Err(e) => fail(format!("reading '{}': {}", path, e)),
        },
    };

    // Convert and write output
    match cli.output {
        Some(path) => {
            let file = File::create(&path)
                .unwrap_or_else(|e| fail(format!("writing '{}': {}", path, e)));
            let stats = transpiler
                .convert_stream(reader, BufWriter::new(file), from_dialect, to_dialect)
                .unwrap_or_else(|e| fail(e));
            println!(
                "Converted {} -> {} written to '{}' ({} lines in, {} out, {} dropped)",
                from_dialect,
                to_dialect,
                path,
                stats.lines_read,
                stats.lines_emitted,
                stats.lines_dropped
            );
        }
        None => {
            let stdout = io::stdout();
            transpiler
                .convert_stream(reader, BufWriter::new(stdout.lock()), from_dialect, to_dialect)
                .unwrap_or_else(|e| fail(e));
        }
    }
}
