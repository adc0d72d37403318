use cssx_lexer::config::{LexerOptions, RuntimeConfig};
use cssx_lexer::{logging, pipeline};
use std::env;
use std::path::Path;

/// Command line switches
#[derive(Debug, Default)]
struct CliOptions {
    input: Option<String>,
    config: Option<String>,
    json: bool,
    extended: bool,
    quiet: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("cssx-lex");

    if args.iter().skip(1).any(|arg| arg == "--help") {
        print_help(program);
        return Ok(());
    }

    let cli = parse_options(&args[1.min(args.len())..]);
    let Some(input) = cli.input.as_deref() else {
        eprintln!("Usage: {} <file> [--config FILE] [--json] [--extended] [--quiet]", program);
        eprintln!("       {} --help", program);
        std::process::exit(1);
    };

    let mut config = match cli.config.as_deref() {
        Some(path) => RuntimeConfig::load(Path::new(path))?,
        None => RuntimeConfig::default(),
    };
    if cli.quiet {
        config.logging.enable_console_logging = false;
    }

    let startup = logging::config::init_runtime_preferences(config.logging.clone())
        .and_then(|_| logging::init_global_logging())
        .and_then(|_| pipeline::validate_pipeline());
    if let Err(message) = startup {
        eprintln!(
            "error[{}]: {}",
            logging::codes::system::INITIALIZATION_FAILURE,
            message
        );
        std::process::exit(1);
    }

    if let Some(path) = cli.config.as_deref() {
        cssx_lexer::log_success!(
            logging::codes::success::CONFIGURATION_LOADED,
            "Runtime configuration loaded",
            "path" => path
        );
    }

    let options = if cli.extended {
        LexerOptions {
            quasi_definitions: config.lexer.quasi_definitions.clone(),
            annotation_definitions: config.lexer.annotation_definitions.clone(),
            ..LexerOptions::extended()
        }
    } else {
        config.lexer.clone()
    };

    let result = match pipeline::process_file(input, &options) {
        Ok(result) => result,
        Err(error) => {
            eprintln!("error[{}]: {}", error.error_code(), error);
            std::process::exit(1);
        }
    };

    if cli.json {
        println!("{}", pipeline::PipelineOutput::new(&result).to_json()?);
        return Ok(());
    }

    if !cli.quiet {
        print!("{}", result.tree.dump(&result.source));
        println!();
    }

    for diagnostic in result.diagnostics() {
        eprintln!("{}", diagnostic);
    }

    print_summary(&result);

    if !result.is_clean() {
        std::process::exit(2);
    }
    Ok(())
}

fn parse_options(args: &[String]) -> CliOptions {
    let mut cli = CliOptions::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                if i + 1 < args.len() {
                    cli.config = Some(args[i + 1].clone());
                    i += 1;
                } else {
                    eprintln!("Warning: --config requires a file path");
                }
            }
            "--json" => cli.json = true,
            "--extended" => cli.extended = true,
            "--quiet" => cli.quiet = true,
            arg if arg.starts_with("--") => {
                eprintln!("Warning: Unknown option '{}'", arg);
            }
            arg => {
                if cli.input.is_some() {
                    eprintln!("Warning: Ignoring extra input '{}'", arg);
                } else {
                    cli.input = Some(arg.to_string());
                }
            }
        }
        i += 1;
    }

    cli
}

fn print_summary(result: &pipeline::PipelineResult) {
    let counts = &result.node_counts;
    let metrics = &result.lexical_metrics;

    println!("=== Lexing Summary ===");
    println!("File: {}", result.file_metadata.path.display());
    println!(
        "Size: {} ({} lines)",
        result.file_metadata.human_readable_size(),
        result.file_metadata.line_count
    );
    println!(
        "Nodes: {} ({} branches, {} leaves, {} significant)",
        counts.total,
        counts.branches,
        counts.leaves,
        counts.significant_nodes()
    );
    println!("Deepest nesting: {}", counts.max_depth);
    println!("Invalid nodes: {}", counts.invalid);
    println!("Recoveries: {}", metrics.recoveries);
    println!(
        "Duration: {:.2}ms (lexing {:.2}ms)",
        result.processing_duration.as_secs_f64() * 1000.0,
        metrics.duration.as_secs_f64() * 1000.0
    );

    if !counts.by_kind.is_empty() {
        println!("By kind:");
        for (kind, count) in &counts.by_kind {
            println!("    {:<12} {}", kind, count);
        }
    }
}

fn print_help(program_name: &str) {
    println!("cssx-lex v{}", env!("CARGO_PKG_VERSION"));
    println!("Lex a CSS-superset stylesheet into its lexical node tree");
    println!();
    println!("USAGE:");
    println!("    {} <file> [options]", program_name);
    println!();
    println!("OPTIONS:");
    println!("    --help              Show this help message");
    println!("    --config FILE       Load lexer and logging options from a TOML file");
    println!("    --json              Print the tree and counts as JSON");
    println!("    --extended          Enable every dialect extension");
    println!("    --quiet             Print only the summary and diagnostics");
    println!();
    println!("EXIT STATUS:");
    println!("    0    The source lexed without malformed constructs");
    println!("    1    The file or configuration could not be used");
    println!("    2    The source contains malformed constructs");
    println!();
    println!("EXAMPLES:");
    println!("    {} style.css", program_name);
    println!("    {} theme.cssx --config cssx.toml --json", program_name);
    println!();
    print!("{}", logging::config::get_config_summary());
}
