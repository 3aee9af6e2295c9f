use std::time::Duration;

use chrono::Utc;
use clap::Subcommand;
use rooted_core::breathing::{find_technique, TECHNIQUES};
use rooted_core::dashboard::breathwork_stats;
use rooted_core::{BreathingDriver, BreathingSession, Event, SessionRecord};

use super::{load_config, open_store, print_json, runtime, session_log, CliResult};

#[derive(Subcommand)]
pub enum BreatheAction {
    /// List breathing techniques
    Techniques {
        #[arg(long)]
        json: bool,
    },
    /// Run a guided session in real time
    Run {
        /// Technique id (box, calming, energy)
        technique: String,
        /// Cycles to complete (default from config)
        #[arg(long)]
        cycles: Option<u32>,
        /// Print every event as a JSON line
        #[arg(long)]
        json: bool,
        /// Tick period in milliseconds
        #[arg(long, default_value_t = 1000, hide = true)]
        tick_ms: u64,
    },
    /// Show logged sessions
    History {
        #[arg(long)]
        json: bool,
    },
}

fn render(event: &Event, name: &str, target: u32) {
    match event {
        Event::SessionStarted {
            phase_label,
            phase_secs,
            ..
        } => {
            println!("{name}: {target} cycles");
            println!("  cycle 1/{target}  {phase_label} ({phase_secs}s)");
        }
        Event::PhaseAdvanced {
            phase_label,
            phase_secs,
            completed_cycles,
            ..
        } => {
            println!(
                "  cycle {}/{target}  {phase_label} ({phase_secs}s)",
                completed_cycles + 1
            );
        }
        Event::SessionCompleted {
            completed_cycles, ..
        } => println!("Completed {completed_cycles} cycles of {name}"),
        Event::SessionStopped {
            completed_cycles, ..
        } => println!("Stopped after {completed_cycles}/{target} cycles"),
        Event::StateSnapshot { .. } => {}
    }
}

async fn drive(
    session: BreathingSession,
    cycles: u32,
    period: Duration,
    json: bool,
) -> Result<BreathingSession, String> {
    let name = session.technique().map_or("", |t| t.name);
    let (mut driver, mut events) = BreathingDriver::with_period(session, period);
    if !driver.start(cycles) {
        return Err("session could not start".into());
    }
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                if json {
                    println!("{}", serde_json::to_string(&event).map_err(|e| e.to_string())?);
                } else {
                    render(&event, name, cycles);
                }
                if event.is_terminal() {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                if let Some(event) = driver.stop() {
                    if json {
                        println!("{}", serde_json::to_string(&event).map_err(|e| e.to_string())?);
                    } else {
                        render(&event, name, cycles);
                    }
                }
                break;
            }
        }
    }
    Ok(driver.session())
}

pub fn run(action: BreatheAction) -> CliResult {
    match action {
        BreatheAction::Techniques { json } => {
            if json {
                print_json(&TECHNIQUES)?;
            } else {
                for t in &TECHNIQUES {
                    println!(
                        "{:<8} {:<18} {} min  {:?}  {}",
                        t.id, t.name, t.duration_min, t.pattern, t.description
                    );
                }
            }
        }
        BreatheAction::Run {
            technique,
            cycles,
            json,
            tick_ms,
        } => {
            let config = load_config()?;
            let technique = find_technique(&technique)
                .ok_or_else(|| format!("unknown technique: {technique}"))?;
            let cycles = cycles.unwrap_or(config.breathing.default_cycles);
            if cycles == 0 {
                return Err("cycles must be at least 1".into());
            }

            let mut session = BreathingSession::new(config.breathing.zero_phase);
            session.select(technique);
            let period = Duration::from_millis(tick_ms.max(1));
            let session = runtime()?.block_on(drive(session, cycles, period, json))?;

            if session.completed_cycles() >= cycles {
                if let Some(record) = SessionRecord::from_session(&session, Utc::now()) {
                    let store = open_store()?;
                    let count = session_log(&store, &config).append(record)?;
                    tracing::info!(technique = technique.id, cycles, count, "session logged");
                }
            }
        }
        BreatheAction::History { json } => {
            let config = load_config()?;
            let store = open_store()?;
            let records = session_log(&store, &config).list()?;
            if json {
                print_json(&records)?;
            } else if records.is_empty() {
                println!("no sessions yet");
            } else {
                for r in &records {
                    println!(
                        "{}  {:<18} {} cycles",
                        r.completed_at.format("%Y-%m-%d %H:%M"),
                        r.technique,
                        r.cycles
                    );
                }
                let stats = breathwork_stats(&records);
                println!(
                    "{} sessions, {} cycles, {} min",
                    stats.sessions, stats.cycles, stats.minutes
                );
            }
        }
    }
    Ok(())
}
