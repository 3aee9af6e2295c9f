use chrono::{Local, Timelike};
use rooted_core::dashboard::overview;
use rooted_core::ProfileStore;

use super::{load_config, open_store, print_json, session_log, CliResult};

pub fn run(json: bool) -> CliResult {
    let config = load_config()?;
    let store = open_store()?;
    let profile = ProfileStore::new(&store).load()?.unwrap_or_default();
    let log = session_log(&store, &config).list()?;
    let view = overview(&profile, &log, Local::now().hour(), &mut rand::thread_rng());

    if json {
        return print_json(&view);
    }

    println!("{}", view.welcome);
    if let (Some(mentor), Some(message)) = (&view.mentor, view.mentor_message) {
        println!("{mentor}: {message}");
    }
    println!();
    match (&view.burnout, view.stress) {
        (Some(summary), Some(stress)) => {
            println!(
                "Burnout  {:?} ({}%): {}",
                summary.level, summary.average, summary.message
            );
            println!("Stress   {stress}%");
        }
        _ => println!("No assessment yet. Try: rooted-cli assess questions"),
    }
    let stats = &view.breathwork;
    print!(
        "Breathwork  {} sessions, {} cycles, {} min",
        stats.sessions, stats.cycles, stats.minutes
    );
    match stats.last_session {
        Some(at) => println!(" (last {})", at.with_timezone(&Local).format("%Y-%m-%d %H:%M")),
        None => println!(),
    }
    Ok(())
}
