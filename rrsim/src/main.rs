//! # RRSim
//!
//! Main entry point for the round-robin scheduling simulator.

use rrsim::{ConfigLoader, HostRuntime, HostRuntimeConfig};
use std::env;
use std::fs;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    let (config_path, config) = parse_args(&args).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        print_usage(&args[0]);
        process::exit(1);
    });

    let simulation = ConfigLoader::load_from_path(&config_path).unwrap_or_else(|e| {
        eprintln!("Failed to load {}: {}", config_path, e);
        process::exit(1);
    });

    let mut runtime = HostRuntime::new(config, simulation).unwrap_or_else(|e| {
        eprintln!("Failed to create runtime: {}", e);
        process::exit(1);
    });

    while runtime.is_running() {
        if let Err(e) = runtime.step() {
            eprintln!("Runtime error: {}", e);
            process::exit(1);
        }
        for line in runtime.take_output() {
            println!("{}", line);
        }
    }
}

fn parse_args(args: &[String]) -> Result<(String, HostRuntimeConfig), String> {
    let mut config = HostRuntimeConfig::default();
    let mut config_path = None;
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --config".to_string());
                }
                config_path = Some(args[i].clone());
            }
            "--script" | "-s" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --script".to_string());
                }
                let script_text = fs::read_to_string(&args[i])
                    .map_err(|e| format!("Failed to read script file: {}", e))?;
                config.script = Some(script_text);
            }
            "--max-steps" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --max-steps".to_string());
                }
                config.max_steps = args[i]
                    .parse()
                    .map_err(|_| format!("Invalid max-steps value: {}", args[i]))?;
            }
            "--speed" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --speed".to_string());
                }
                config.speed = args[i]
                    .parse()
                    .map_err(|_| format!("Invalid speed value: {}", args[i]))?;
            }
            "--realtime" => {
                config.realtime = true;
            }
            "--json" => {
                config.json = true;
            }
            "--trace" => {
                config.trace = true;
            }
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other => {
                return Err(format!("Unknown option: {}", other));
            }
        }
        i += 1;
    }

    let config_path = config_path.ok_or_else(|| "Missing --config".to_string())?;
    Ok((config_path, config))
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} --config <FILE> [OPTIONS]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --config <FILE>      Simulation configuration (JSON)");
    eprintln!("  -s, --script <FILE>      Command script (default: run, stats)");
    eprintln!("  --max-steps <N>          Maximum ticks to advance (0 = unlimited)");
    eprintln!("  --speed <X>              Play speed multiplier (default 1.0)");
    eprintln!("  --realtime               Sleep between played ticks");
    eprintln!("  --json                   Print views and reports as JSON");
    eprintln!("  --trace                  Print execution trace events");
    eprintln!("  -h, --help               Show this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} --config demos/multi_burst.json --trace", program);
    eprintln!(
        "  {} --config demos/single_burst.json --script demos/walkthrough.rrs --realtime --speed 4",
        program
    );
}
