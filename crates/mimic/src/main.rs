//! mimic demo CLI
//!
//! Runs duplication scenarios against the global engine.

mod logging;
mod scenarios;

use mimic_types::Pool;

use scenarios::{find, Scenario, SCENARIOS};

fn main() {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        print_usage();
        return;
    }
    if args.iter().any(|arg| arg == "--list") {
        for scenario in SCENARIOS {
            println!("{:<10} {}", scenario.name, scenario.summary);
        }
        return;
    }

    let mut selected: Vec<&Scenario> = Vec::new();
    for arg in &args {
        if arg.starts_with('-') {
            eprintln!("error: unknown option `{arg}`");
            print_usage();
            std::process::exit(2);
        }
        let Some(scenario) = find(arg) else {
            eprintln!("error: unknown scenario `{arg}` (see `mimic --list`)");
            std::process::exit(2);
        };
        selected.push(scenario);
    }
    if selected.is_empty() {
        selected = SCENARIOS.iter().collect();
    }

    let pool = Pool::global();
    let mut failures = 0;
    for scenario in selected {
        println!("{}: {}", scenario.name, scenario.summary);
        tracing::debug!(scenario = scenario.name, "running scenario");
        if let Err(err) = (scenario.run)(pool) {
            failures += 1;
            eprintln!("  FAILED: {err}");
        }
    }

    if failures > 0 {
        eprintln!("{failures} scenario(s) failed");
        std::process::exit(1);
    }
}

fn print_usage() {
    eprintln!("Usage: mimic [scenario...]");
    eprintln!();
    eprintln!("Runs every scenario when none is named.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --list       List scenarios");
    eprintln!("  -h, --help   Show this help");
}
