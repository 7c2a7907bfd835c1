//! Evolab CLI - Run algorithms generation by generation from the terminal.

use std::fs;
use std::path::PathBuf;

use serde_json::Value;

use evolab::{
    Algorithm, EAConfig, EaError, Runner,
    compute::{RunHistory, RunProgress, RunSummary},
};

struct Options {
    algorithms: Vec<Algorithm>,
    config_path: Option<PathBuf>,
    generations: Option<usize>,
    seed: Option<u64>,
    json: bool,
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage(&args[0]);
        return;
    }

    if args.get(1).is_some_and(|a| a == "--example") {
        print_example_config();
        return;
    }

    let options = parse_args(&args[1..]).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        eprintln!();
        print_usage(&args[0]);
        std::process::exit(1);
    });

    // Load configuration
    let mut config = match &options.config_path {
        Some(path) => {
            let config_str = fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("Error reading config file: {}", e);
                std::process::exit(1);
            });
            serde_json::from_str::<EAConfig>(&config_str).unwrap_or_else(|e| {
                eprintln!("Error parsing config: {}", e);
                std::process::exit(1);
            })
        }
        None => EAConfig::default(),
    };
    if let Some(generations) = options.generations {
        config.max_generations = generations;
    }
    if options.seed.is_some() {
        config.random_seed = options.seed;
    }

    let mut failures = 0;
    for &algorithm in &options.algorithms {
        // A failed run is reported and abandoned; the others still run.
        if let Err(e) = run_algorithm(algorithm, &config, options.json) {
            log::error!("{} run aborted: {}", algorithm, e);
            eprintln!("Error running {}: {}", algorithm.full_name(), e);
            failures += 1;
        }
    }

    if failures > 0 {
        std::process::exit(1);
    }
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options {
        algorithms: Algorithm::ALL.to_vec(),
        config_path: None,
        generations: None,
        seed: None,
        json: false,
    };

    let mut iter = args.iter();
    let mut positional = 0;
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => options.json = true,
            "--generations" | "-g" => {
                let value = iter.next().ok_or("--generations needs a value")?;
                options.generations =
                    Some(value.parse().map_err(|_| format!("Invalid generations: {value}"))?);
            }
            "--seed" | "-s" => {
                let value = iter.next().ok_or("--seed needs a value")?;
                options.seed = Some(value.parse().map_err(|_| format!("Invalid seed: {value}"))?);
            }
            flag if flag.starts_with('-') => return Err(format!("Unknown flag: {flag}")),
            value if positional == 0 && !value.ends_with(".json") => {
                if !value.eq_ignore_ascii_case("all") {
                    let algorithm: Algorithm =
                        value.parse().map_err(|e: EaError| e.to_string())?;
                    options.algorithms = vec![algorithm];
                }
                positional += 1;
            }
            path if options.config_path.is_none() => {
                options.config_path = Some(PathBuf::from(path));
                positional += 1;
            }
            extra => return Err(format!("Unexpected argument: {extra}")),
        }
    }

    Ok(options)
}

fn run_algorithm(algorithm: Algorithm, base: &EAConfig, json: bool) -> Result<(), EaError> {
    let config = algorithm.reconcile(base);
    let mut runner = Runner::new(algorithm, config)?;

    if json {
        let summary = runner.run()?;
        print_json_report(&summary, runner.history());
        return Ok(());
    }

    println!();
    println!("========================================");
    println!("Running Algorithm: {} ({})", algorithm.full_name(), algorithm);
    println!("========================================");

    let summary = runner.run_with_callback(print_progress)?;

    println!();
    println!("{} finished ({:?}).", algorithm, summary.stop_reason);
    println!(
        "Final best individual: ID {}, Fitness {:.4}",
        summary.best_id, summary.best_fitness
    );
    println!("Genes: {}", format_value(&Value::from(summary.best_genes.clone())));
    println!(
        "Time: {:.3}s ({} generations)",
        summary.elapsed_seconds, summary.generations
    );
    Ok(())
}

fn print_progress(progress: &RunProgress<'_>) {
    match progress.log {
        None => {
            println!();
            println!("Initial population (size {}):", progress.population.len());
            let rows: Vec<Value> = progress
                .population
                .fitness_values()
                .into_iter()
                .zip(progress.population.genes_matrix())
                .enumerate()
                .map(|(id, (fitness, genes))| {
                    serde_json::json!({ "id": id, "fitness": fitness, "genes": genes })
                })
                .collect();
            print_table(&rows);
        }
        Some(log) => {
            println!();
            println!("--- Generation {} ---", progress.generation);
            let rows = serde_json::to_value(log)
                .ok()
                .and_then(|v| v.get("entries").and_then(Value::as_array).cloned())
                .unwrap_or_default();
            print_table(&rows);
            println!(
                "Gen {} best fitness: {:.4} (avg {:.4})",
                progress.generation, progress.best_fitness, progress.avg_fitness
            );
        }
    }
}

fn print_json_report(summary: &RunSummary, history: &RunHistory) {
    let report = serde_json::json!({ "summary": summary, "history": history });
    match serde_json::to_string(&report) {
        Ok(line) => println!("{}", line),
        Err(e) => eprintln!("Error serializing report: {}", e),
    }
}

/// Print rows of JSON objects as `key=value` columns.
fn print_table(rows: &[Value]) {
    for row in rows {
        let Some(fields) = row.as_object() else {
            continue;
        };
        let cells: Vec<String> = fields
            .iter()
            .map(|(key, value)| format!("{}={}", key, format_value(value)))
            .collect();
        println!("  {}", cells.join("  "));
    }
}

/// Numbers with 4 decimals, number arrays with 2.
fn format_value(value: &Value) -> String {
    match value {
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .map(|item| match item.as_f64() {
                    Some(n) => format!("{:.2}", n),
                    None => format_value(item),
                })
                .collect();
            format!("[{}]", parts.join(", "))
        }
        Value::Number(n) if n.is_f64() => format!("{:.4}", n.as_f64().unwrap_or_default()),
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

fn print_usage(program: &str) {
    eprintln!(
        "Usage: {} [ALGO|all] [config.json] [--generations N] [--seed S] [--json]",
        program
    );
    eprintln!("       {} --example", program);
    eprintln!();
    eprintln!("Run evolutionary algorithms generation by generation.");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  ALGO         One of GA, DE, PSO, GP, ES, or all (default: all)");
    eprintln!("  config.json  Configuration file (default: built-in defaults)");
    eprintln!("  --example    Print the default configuration as JSON");
    eprintln!();
    eprintln!("Set RUST_LOG=debug for per-generation logging.");
}

fn print_example_config() {
    let config = EAConfig::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing config: {}", e),
    }
}
