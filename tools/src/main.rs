//! roster-runner: headless front end for the roster engine.
//!
//! Usage:
//!   roster-runner generate --year 2026 --week 42 --seed 12345 --db roster.db --away CB --unavailable Monday=DS,HS
//!   roster-runner history --db roster.db
//!   roster-runner --db roster.db history
//!   roster-runner set-rate AH 80 --db roster.db
//!   roster-runner import --year 2026 --week 41 --cells week41.json --db roster.db
//!   roster-runner clear-history --db roster.db
//!   roster-runner --ipc-mode --db roster.db

use anyhow::{bail, Context, Result};
use roster_core::{
    calendar::Weekday,
    command::{CommandOutcome, RosterCommand},
    config::RosterConfig,
    engine::RosterEngine,
    event::RosterEvent,
    snapshot::GeneratedWeek,
    store::RosterStore,
    template::CellGrid,
    types::WeekNumber,
};
use std::collections::BTreeMap;
use std::env;
use std::io::{self, BufRead, Write};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = flag_value(&args, "--db").unwrap_or("roster.db");
    let data_dir = flag_value(&args, "--data-dir").unwrap_or("./data");

    let config = RosterConfig::load(data_dir)?;
    let store = RosterStore::open(db)?;
    store.migrate()?;
    let mut engine = RosterEngine::new(config, store);

    if ipc_mode {
        return run_ipc_loop(&mut engine);
    }

    let positional = positionals(&args);
    let subcommand = positional.first().copied().unwrap_or("generate");
    let command = match subcommand {
        "generate" => RosterCommand::Generate {
            year: parse_flag(&args, "--year")?,
            week: parse_flag(&args, "--week")?,
            seed: parse_flag(&args, "--seed")?,
            away: flag_value(&args, "--away").map(split_codes).unwrap_or_default(),
            unavailable: parse_unavailable(&args)?,
        },
        "history" => RosterCommand::History,
        "clear-history" => RosterCommand::ClearHistory,
        "set-rate" => {
            let employee = positional.get(1).context("set-rate needs an employee code")?;
            let rate = positional
                .get(2)
                .context("set-rate needs a rate")?
                .parse()
                .context("rate must be an integer")?;
            RosterCommand::SetWorkRate { employee: employee.to_string(), rate }
        }
        "import" => {
            let week: WeekNumber = parse_flag(&args, "--week")?.context("import needs --week")?;
            let path = flag_value(&args, "--cells").context("import needs --cells FILE")?;
            let content = std::fs::read_to_string(path).with_context(|| format!("Cannot read {path}"))?;
            let cells: CellGrid = serde_json::from_str(&content)?;
            RosterCommand::ImportSchedule { year: parse_flag(&args, "--year")?, week, cells }
        }
        other => bail!("unknown command '{other}'"),
    };

    let outcome = engine.apply(command)?;
    if let CommandOutcome::Generated { schedule } = &outcome {
        if let Some(out) = flag_value(&args, "--out") {
            std::fs::write(out, serde_json::to_string_pretty(schedule)?)
                .with_context(|| format!("Cannot write {out}"))?;
        }
    }
    print_outcome(&outcome);
    Ok(())
}

/// Line-delimited JSON: one RosterCommand per line, one response per line.
/// `{"cmd": "quit"}` or EOF ends the loop.
fn run_ipc_loop(engine: &mut RosterEngine) -> Result<()> {
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
        if buffer.trim().is_empty() {
            continue;
        }

        let value: serde_json::Value = match serde_json::from_str(&buffer) {
            Ok(v) => v,
            Err(e) => {
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };
        if value["cmd"] == "quit" {
            break;
        }

        let response = serde_json::from_value::<RosterCommand>(value)
            .map_err(anyhow::Error::from)
            .and_then(|cmd| engine.apply(cmd).map_err(anyhow::Error::from));
        match response {
            Ok(outcome) => writeln!(stdout, "{}", serde_json::to_string(&outcome)?)?,
            Err(e) => {
                log::warn!("ipc: command failed: {e}");
                write_error(&mut stdout, &e.to_string())?;
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

#[derive(serde::Serialize)]
struct IpcError<'a> {
    error: &'a str,
}

fn write_error(stdout: &mut io::Stdout, message: &str) -> Result<()> {
    writeln!(stdout, "{}", serde_json::to_string(&IpcError { error: message })?)?;
    stdout.flush()?;
    Ok(())
}

fn print_outcome(outcome: &CommandOutcome) {
    match outcome {
        CommandOutcome::Generated { schedule } => print_schedule(schedule),
        CommandOutcome::WorkRateSet { employee, rate } => println!("Work rate saved: {employee} = {rate}%"),
        CommandOutcome::History { distribution } => {
            println!("=== MDK DISTRIBUTION ===");
            if distribution.is_empty() {
                println!("  (no duty history yet)");
            }
            for (code, count) in distribution {
                println!("  {code:<4} {count:>3} {}", "#".repeat(*count as usize));
            }
        }
        CommandOutcome::HistoryCleared { deleted } => println!("Deleted {deleted} duty records."),
        CommandOutcome::Imported { week, duties } => {
            println!("Imported {duties} duty assignments for week {week}.")
        }
    }
}

fn print_schedule(schedule: &GeneratedWeek) {
    println!("=== WEEK {} ===", schedule.week);
    println!("  run_id: {}", schedule.run_id);
    println!("  seed:   {}", schedule.seed);
    println!("  at:     {}", chrono::Local::now().format("%Y-%m-%d %H:%M"));
    println!();

    for (day, a) in &schedule.assignment.days {
        println!("{} ({})", day.swedish_name(), day);
        if let Some(duty) = &a.duty {
            println!("  MDK:          {duty}");
        }
        if let Some(guard) = &a.lunch_guard {
            println!("  Lunch guard:  {guard}");
        }
        let labs = |layout: &BTreeMap<String, String>| {
            layout
                .iter()
                .map(|(p, s)| format!("{s}={p}"))
                .collect::<Vec<_>>()
                .join(", ")
        };
        println!("  AM labs:      {}", labs(&a.morning_lab));
        println!("  AM screen/MR: {}", a.morning_screen.join("/"));
        if let (Some(lab), Some(screen)) = (&a.afternoon_lab, &a.afternoon_screen) {
            println!("  PM labs:      {}", labs(lab));
            println!("  PM screen/MR: {}", screen.join("/"));
        }
    }

    let warnings = schedule.warnings();
    if !warnings.is_empty() {
        println!();
        println!("=== WARNINGS ===");
        for w in warnings {
            println!("  {}", describe_warning(w));
        }
    }
}

fn describe_warning(event: &RosterEvent) -> String {
    match event {
        RosterEvent::EmptyPool { day, phase } => format!("{day}: nobody available for {phase:?}"),
        RosterEvent::DutyUnfilled { day } => format!("{day}: MDK left unfilled"),
        RosterEvent::ScreeningShortfall { day, block, requested, filled } => {
            format!("{day} {block:?}: screening {filled}/{requested} filled")
        }
        RosterEvent::ScreeningCapOverflow { day, block, employees } => {
            format!("{day} {block:?}: weekly screening cap exceeded by {}", employees.join(", "))
        }
        RosterEvent::DerangementFallback { day, repeated, .. } => {
            format!("{day}: same lab morning and afternoon for {}", repeated.join(", "))
        }
        other => other.type_name().to_string(),
    }
}

/// `--unavailable Monday=DS,HS` may repeat. None when the flag is absent,
/// so the configured default absences apply.
fn parse_unavailable(args: &[String]) -> Result<Option<BTreeMap<Weekday, Vec<String>>>> {
    let specs: Vec<&str> = args
        .windows(2)
        .filter(|w| w[0] == "--unavailable")
        .map(|w| w[1].as_str())
        .collect();
    if specs.is_empty() {
        return Ok(None);
    }
    let mut per_day = BTreeMap::new();
    for spec in specs {
        let (day, codes) = spec
            .split_once('=')
            .with_context(|| format!("expected Day=A,B, got '{spec}'"))?;
        let day: Weekday = day.parse()?;
        per_day.entry(day).or_insert_with(Vec::new).extend(split_codes(codes));
    }
    Ok(Some(per_day))
}

fn split_codes(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(String::from)
        .collect()
}

/// Flags that take a value. Everything else starting with `--` is a switch.
const VALUE_FLAGS: [&str; 9] = [
    "--db", "--data-dir", "--year", "--week", "--seed", "--away", "--unavailable", "--out", "--cells",
];

/// Arguments after the program name that are neither flags nor flag values,
/// so `--db x history` and `history --db x` name the same subcommand.
fn positionals(args: &[String]) -> Vec<&str> {
    let mut found = Vec::new();
    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            rest.next();
        } else if !arg.starts_with("--") {
            found.push(arg.as_str());
        }
    }
    found
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}

fn parse_flag<T>(args: &[String], flag: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    flag_value(args, flag)
        .map(|v| v.parse::<T>().with_context(|| format!("invalid value for {flag}: {v}")))
        .transpose()
}
