//! race-runner: headless runner for the space race.
//!
//! Usage:
//!   race-runner --seed 12345 --turns 60 --script data/demo_script.json
//!   race-runner --seed 12345 --ipc-mode

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use spacerace_core::{
    calendar::text_year,
    command::GameCommand,
    config::SimConfig,
    engine::{GameState, SimEngine},
    event::{Audience, SimEvent},
    spaceship::ShipInfo,
    store::SimStore,
    types::Tick,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Turn { count: u64 },
    Command { command: GameCommand },
    Quit,
}

/// One scripted command, applied before turn `turn` is run.
#[derive(Debug, Deserialize)]
struct ScriptEntry {
    turn:    u64,
    command: GameCommand,
}

#[derive(Serialize)]
struct UiState {
    tick:   Tick,
    year:   i32,
    paused: bool,
    state:  GameState,
    ships:  Vec<ShipInfo>,
}

#[derive(Serialize)]
struct IpcReply<'a> {
    events: &'a [SimEvent],
    state:  UiState,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let turns = parse_arg(&args, "--turns", 100u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = string_arg(&args, "--db").unwrap_or(":memory:");
    let data_dir = string_arg(&args, "--data-dir").unwrap_or("./data");
    let script_path = string_arg(&args, "--script");

    if !ipc_mode {
        println!("Space Race: race-runner");
        println!("  seed:      {seed}");
        println!("  turns:     {turns}");
        println!("  db:        {db}");
        println!("  data_dir:  {data_dir}");
        if let Some(path) = script_path {
            println!("  script:    {path}");
        }
        println!();
    }

    let config = SimConfig::load(data_dir)?;
    let store = SimStore::open(db)?;
    store.migrate()?;

    let run_id = format!("run-{seed}-{}", chrono::Utc::now().timestamp());
    store.insert_run(&run_id, seed, env!("CARGO_PKG_VERSION"))?;

    let mut engine = SimEngine::build(run_id.clone(), seed, store, &config)?;

    if ipc_mode {
        run_ipc_loop(&mut engine)?;
    } else {
        let script = match script_path {
            Some(path) => load_script(path)?,
            None => Vec::new(),
        };
        run_batch(&mut engine, &script, turns)?;
        print_summary(&engine, &run_id)?;
    }

    Ok(())
}

fn load_script(path: &str) -> Result<Vec<ScriptEntry>> {
    let content = std::fs::read_to_string(path).with_context(|| format!("Cannot read {path}"))?;
    let mut script: Vec<ScriptEntry> =
        serde_json::from_str(&content).with_context(|| format!("Cannot parse {path}"))?;
    // Stable: same-turn commands keep their file order.
    script.sort_by_key(|e| e.turn);
    Ok(script)
}

fn run_batch(engine: &mut SimEngine, script: &[ScriptEntry], turns: u64) -> Result<()> {
    let mut pending = script.iter().peekable();

    for turn in 0..turns {
        while let Some(entry) = pending.next_if(|e| e.turn <= turn) {
            match engine.submit_command(entry.command.clone()) {
                Ok(events) => print_events(&events),
                Err(e) => log::warn!("turn={turn} script command {:?} failed: {e}", entry.command),
            }
        }
        if engine.is_over() {
            break;
        }
        print_events(&engine.run_turns(1)?);
    }

    let skipped = pending.count();
    if skipped > 0 {
        log::info!("{skipped} scripted command(s) never ran");
    }
    Ok(())
}

/// Broadcasts and player notices. Per-player ship syncs stay quiet.
fn print_events(events: &[SimEvent]) {
    for event in events {
        if let Some(message) = event.message() {
            let to = match event.audience() {
                Audience::Player(p) => format!("player {p}"),
                Audience::All => "all".to_string(),
                Audience::Server => "server".to_string(),
            };
            println!("  [{}] {to}: {message}", event.type_name());
        }
    }
}

fn run_ipc_loop(engine: &mut SimEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        let events = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => Vec::new(),
            IpcCommand::Turn { count } => engine.run_turns(count)?,
            IpcCommand::Command { command } => match engine.submit_command(command) {
                Ok(events) => events,
                Err(e) => {
                    let err_json = serde_json::json!({ "error": e.to_string() });
                    writeln!(stdout, "{}", err_json)?;
                    stdout.flush()?;
                    continue;
                }
            },
        };

        let reply = IpcReply { events: &events, state: build_ui_state(engine)? };
        writeln!(stdout, "{}", serde_json::to_string(&reply)?)?;
        stdout.flush()?;
    }
    Ok(())
}

fn build_ui_state(engine: &SimEngine) -> Result<UiState> {
    let race = engine.spacerace().context("spacerace subsystem not registered")?;
    let ships = race
        .players()
        .iter()
        .map(|p| p.spaceship.info(p.id))
        .collect();

    Ok(UiState {
        tick:   engine.clock.current_tick,
        year:   race.current_year(),
        paused: engine.clock.paused,
        state:  engine.game_state(),
        ships,
    })
}

fn print_summary(engine: &SimEngine, run_id: &str) -> Result<()> {
    let race = engine.spacerace().context("spacerace subsystem not registered")?;
    let launches = engine.store.event_count(run_id, "spaceship_launched")?;
    let losses = engine.store.event_count(run_id, "spaceship_lost")?;

    println!();
    println!("=== RUN SUMMARY ===");
    println!("  run_id:      {run_id}");
    println!("  turns run:   {}", engine.clock.current_tick);
    println!("  final year:  {}", text_year(race.current_year()));
    println!("  launches:    {launches}");
    println!("  ships lost:  {losses}");
    match engine.game_state() {
        GameState::Over { winner } => {
            println!("  winner:      {}", race.player(winner)?.nation_plural);
        }
        GameState::Running => println!("  winner:      (none yet)"),
    }

    println!();
    println!("=== SHIPS ===");
    for p in race.players() {
        let ship = &p.spaceship;
        let arrival = ship
            .arrival()
            .map(|a| format!("{a:.1}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<12} {:<9} | success {:>5.1}% | travel {:>5.1}y | arrival {:>7} | score {}",
            p.nation_plural,
            format!("{:?}", ship.state()),
            ship.success_rate() * 100.0,
            ship.travel_time(),
            arrival,
            ship.score(),
        );
    }
    Ok(())
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
