//! Scripted coroutine runner
//!
//! Loads a JSON script, pushes it onto a fresh step controller, and prints
//! what happened on every tick until the script finishes or the tick limit
//! is reached.
//!
//! Usage: cargo run -- intro.json [--ticks N] [--config FILE] [--rules FILE] [--force-delayed-swap] [--json]

use clap::Parser;
use framestep::policy::SwapRules;
use framestep::scheduler::{SchedulerConfig, StepController, Tick};
use framestep::script::Script;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "framestep", about = "Replay a scripted coroutine one tick at a time")]
struct Args {
    /// Script to run
    script: PathBuf,
    /// Stop after this many ticks even if the script is still running
    #[arg(long, default_value_t = 1_000)]
    ticks: u32,
    /// Scheduler configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Swap rule table (JSON)
    #[arg(long)]
    rules: Option<PathBuf>,
    /// Spend an idle tick on every frame swap
    #[arg(long)]
    force_delayed_swap: bool,
    /// Print one JSON object per tick
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct TickLine {
    tick: u32,
    outcome: &'static str,
    steps: u32,
    swaps: u32,
    delayed_swap: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    remaining: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    signal: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top: Option<String>,
}

impl TickLine {
    fn new(tick: u32, outcome: Tick<Value>, top: Option<String>) -> Self {
        let report = outcome.report().copied().unwrap_or_default();
        let mut line = TickLine {
            tick,
            outcome: "",
            steps: report.steps,
            swaps: report.swaps,
            delayed_swap: report.delayed_swap,
            remaining: None,
            signal: None,
            top,
        };
        line.outcome = match outcome {
            Tick::Idle => "idle",
            Tick::Paused => "paused",
            Tick::Halted => "halted",
            Tick::Waiting { remaining } => {
                line.remaining = Some(remaining);
                "waiting"
            }
            Tick::Stepped(_) => "stepped",
            Tick::Signalled { signal, .. } => {
                line.signal = Some(signal);
                "signalled"
            }
        };
        line
    }

    fn print(&self, json: bool) -> Result<(), serde_json::Error> {
        if json {
            println!("{}", serde_json::to_string(self)?);
            return Ok(());
        }

        let mut text = format!("tick {:>4}: {}", self.tick, self.outcome);
        if self.steps > 0 {
            text.push_str(&format!(" steps={} swaps={}", self.steps, self.swaps));
        }
        if self.delayed_swap {
            text.push_str(" (delayed swap)");
        }
        if let Some(remaining) = self.remaining {
            text.push_str(&format!(" remaining={}", remaining));
        }
        if let Some(signal) = &self.signal {
            text.push_str(&format!(" signal={}", signal));
        }
        if let Some(top) = &self.top {
            text.push_str(&format!(" top={}", top));
        }
        println!("{}", text);
        Ok(())
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => SchedulerConfig::from_path(path)?,
        None => SchedulerConfig::default(),
    };
    if args.force_delayed_swap {
        config.force_delayed_swap = true;
    }
    let rules = match &args.rules {
        Some(path) => SwapRules::from_path(path)?,
        None => SwapRules::new(),
    };
    let script = Script::from_path(&args.script)?;
    log::info!("running {} with {} rules", script.name, rules.rules().len());

    let mut ctl = StepController::with_config(config).with_policy(rules);
    ctl.push(script.frame())?;

    for tick in 1..=args.ticks {
        let outcome = ctl.update()?;
        let top = ctl.peek().map(|f| f.to_string());
        TickLine::new(tick, outcome, top).print(args.json)?;

        if ctl.is_finished() {
            log::info!("{} finished after {} ticks", script.name, tick);
            return Ok(());
        }
    }
    log::warn!("{} still running after {} ticks", script.name, args.ticks);
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
