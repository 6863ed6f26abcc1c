//! Permit Check CLI - Validate permit applications against policy
//!
//! Usage:
//!     permit-check --policy policy.json application.json
//!     permit-check --policy base.json --policy lcv-overlay.json application.json
//!     permit-check --policy-dir ./policies --json application.json

use std::path::PathBuf;
use std::process;

use clap::Parser;
use permit_core::{definition, PermitApplication, PolicyEngine, ValidationResult};

#[derive(Parser, Debug)]
#[command(name = "permit-check")]
#[command(about = "Validate a permit application against policy documents")]
#[command(version)]
struct Args {
    /// Path to the permit application JSON file
    application: PathBuf,

    /// Policy document JSON file(s), most-general-first
    #[arg(short, long)]
    policy: Vec<PathBuf>,

    /// Directory of policy documents (*.json, merged in file-name order)
    #[arg(long)]
    policy_dir: Option<PathBuf>,

    /// Output the raw validation result as JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    let engine = match build_engine(&args) {
        Ok(engine) => engine,
        Err(message) => {
            eprintln!("Error loading policy: {}", message);
            process::exit(1);
        }
    };

    let application = match load_application(&args.application) {
        Ok(application) => application,
        Err(message) => {
            eprintln!("Error loading application: {}", message);
            process::exit(1);
        }
    };

    let result = match engine.validate(&application) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error validating application: {}", e);
            process::exit(1);
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing result: {}", e);
                process::exit(1);
            }
        }
    } else {
        print_summary(&application, &result);
    }

    if !result.is_compliant() {
        process::exit(2);
    }
}

fn build_engine(args: &Args) -> Result<PolicyEngine, String> {
    let mut documents = vec![];

    if let Some(dir) = &args.policy_dir {
        documents.extend(
            definition::load_from_directory(dir).map_err(|e| e.to_string())?,
        );
    }
    for path in &args.policy {
        documents.push(definition::load_from_file(path).map_err(|e| e.to_string())?);
    }

    if documents.is_empty() {
        return Err("no policy documents given; use --policy or --policy-dir".to_string());
    }

    PolicyEngine::new(documents).map_err(|e| e.to_string())
}

fn load_application(path: &PathBuf) -> Result<PermitApplication, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    serde_json::from_str(&content).map_err(|e| format!("failed to parse {}: {}", path.display(), e))
}

fn print_summary(application: &PermitApplication, result: &ValidationResult) {
    println!("Permit type: {}", application.permit_type);
    println!(
        "Compliant:   {}",
        if result.is_compliant() { "yes" } else { "NO" }
    );

    if !result.violations.is_empty() {
        println!("\nViolations:");
        for violation in &result.violations {
            println!("  [{}] {}", violation.code, violation.message);
        }
    }

    if !result.warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &result.warnings {
            println!("  [{}] {}", warning.code, warning.message);
        }
    }

    if !result.costs.is_empty() {
        println!("\nCosts:");
        for cost in &result.costs {
            println!("  {:>10.2}  {}", cost.amount, cost.description);
        }
        println!("  {:>10.2}  total", result.total_cost());
    }

    if !result.conditions.is_empty() {
        println!("\nPermit conditions:");
        for condition in &result.conditions {
            println!("  [{}] {}", condition.code, condition.description);
        }
    }
}
