use std::path::{Path, PathBuf};

use clap::Parser;
use log::error;

use thermal_pid::config::StudyConfig;
use thermal_pid::export::{save_poles_csv, write_responses_csv};
use thermal_pid::study::{compare_cases, CaseReport, LoopAnalysis};
use thermal_pid::utils::constants::BAND_5_PERCENT;
use thermal_pid::Result;

/// Design PID temperature controllers by pole placement and check them in simulation
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON study configuration; the two built-in cases are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Relative settling band, overrides the configuration (e.g. 0.02 or 0.05)
    #[arg(short, long)]
    tolerance: Option<f64>,

    /// Directory to write step responses and pole sets to as CSV
    #[arg(long)]
    csv_dir: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    print_config: bool,
}

fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2} %", 100.0 * v),
        None => "undefined".to_string(),
    }
}

fn format_seconds(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.3} s", v),
        None => "undefined".to_string(),
    }
}

fn print_loop(analysis: &LoopAnalysis) {
    println!("  Gains:");
    println!("    K_P = {:.6}", analysis.gains.kp);
    println!("    K_I = {:.6}", analysis.gains.ki);
    println!("    K_D = {:.6}", analysis.gains.kd);
    println!("  Closed loop: {}", analysis.system.transfer_function());
    println!("  Poles:");
    for p in &analysis.poles {
        println!("    {:+.4} {:+.4}j", p.re, p.im);
    }
    println!("  Steady state:    {:.4}", analysis.metrics.steady_state);
    println!("  Overshoot:       {}", format_percent(analysis.metrics.overshoot));
    println!("  Settling time:   {}", format_seconds(analysis.metrics.settling_time));
    println!(
        "  Settling (5 %):  {}",
        format_seconds(analysis.response.metrics(BAND_5_PERCENT).settling_time)
    );
}

fn print_report(report: &CaseReport) {
    println!("{}", report.name);
    println!("{}", "=".repeat(report.name.chars().count()));
    println!(
        "  Target: Mp = {:.1} %, ts = {} s, m = {}",
        100.0 * report.spec.overshoot,
        report.spec.settling_time,
        report.spec.pole_multiplier
    );
    println!("  zeta = {:.6}", report.design.damping_ratio);
    println!("  wn   = {:.6} rad/s", report.design.natural_frequency);
    println!("  p3   = {:.6} rad/s", report.design.third_pole);
    print_loop(&report.nominal);

    if let Some((variation, analysis)) = &report.variation {
        println!();
        println!("  Variation: {} x {}", variation.gain.as_str(), variation.factor);
        print_loop(analysis);
    }
    println!();
}

fn export(dir: &Path, reports: &[CaseReport]) -> Result<()> {
    std::fs::create_dir_all(dir)?;

    let responses: Vec<(&str, _)> = reports
        .iter()
        .map(|r| (r.name.as_str(), &r.nominal.response))
        .collect();
    let path = dir.join("responses.csv");
    write_responses_csv(std::fs::File::create(&path)?, &responses)?;
    println!("Saved {}", path.display());

    for (i, report) in reports.iter().enumerate() {
        let path = save_poles_csv(dir.join(format!("poles_case_{}", i + 1)), &report.nominal.poles)?;
        println!("Saved {}", path.display());
        if let Some((_, analysis)) = &report.variation {
            let path = save_poles_csv(dir.join(format!("poles_case_{}_variation", i + 1)), &analysis.poles)?;
            println!("Saved {}", path.display());
        }
    }
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => StudyConfig::from_file(path)?,
        None => StudyConfig::default(),
    };
    if let Some(tolerance) = args.tolerance {
        config.tolerance = tolerance;
    }

    if args.print_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    println!("PID temperature control - pole placement design");
    println!("===============================================\n");
    let p = &config.physical;
    println!(
        "Plant: C = {}, k = {}, P_max = {}, eta = {}, K_s = {}, tau_m = {}",
        p.thermal_capacity, p.loss_coefficient, p.max_power, p.efficiency, p.sensor_gain, p.sensor_time_constant
    );
    println!(
        "Simulation: {} samples over {} s, settling band {:.1} %\n",
        config.simulation.samples,
        config.simulation.horizon,
        100.0 * config.tolerance
    );

    let reports = compare_cases(&config)?;
    for report in &reports {
        print_report(report);
    }

    if let Some(dir) = &args.csv_dir {
        export(dir, &reports)?;
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
