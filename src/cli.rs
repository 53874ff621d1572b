/// CLI argument parsing and command handling.
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::{Entries, Ideas, Loops, Record, load_mode, save_mode};
use crate::export;
use crate::focus::{FocusPhase, FocusTimer, MAX_MINUTES, MIN_MINUTES};
use crate::store::Store;
use crate::types::Mode;

#[derive(Parser)]
#[command(
    name = "loopos",
    version,
    about = "LoopOS - close open loops, log what got done, focus in blocks"
)]
pub struct Cli {
    /// Directory holding the database, logs and exports.
    #[arg(long, global = true, env = "LOOPOS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `loopos=trace`.
    #[arg(long, global = true, env = "LOOPOS_LOG", default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage open loops.
    Loop {
        #[command(subcommand)]
        command: LoopCommand,
    },
    /// Log finished actions.
    Entry {
        #[command(subcommand)]
        command: EntryCommand,
    },
    /// Park ideas for later.
    Idea {
        #[command(subcommand)]
        command: IdeaCommand,
    },
    /// Show or set the working mode.
    Mode { mode: Option<ModeArg> },
    /// Control the focus timer.
    Focus {
        #[command(subcommand)]
        command: FocusCommand,
    },
    /// Export entries and ideas as plain text.
    Export {
        #[arg(short = 'o', long = "out")]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum LoopCommand {
    Add {
        title: String,
        #[arg(short = 'w', long = "done-when")]
        criterion: Option<String>,
    },
    Done {
        id: String,
    },
    Reopen {
        id: String,
    },
    Rm {
        id: String,
    },
    List {
        #[arg(short = 'a', long = "all")]
        all: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum EntryCommand {
    Add {
        output: String,
        #[arg(short = 'f', long = "fulfilled")]
        fulfilled: bool,
        /// Defaults to today, format YYYY-MM-DD.
        #[arg(short = 'd', long = "date")]
        date: Option<NaiveDate>,
    },
    List,
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum IdeaCommand {
    Add {
        title: String,
        #[arg(short = 'n', long = "notes")]
        notes: Option<String>,
    },
    List,
    Rm {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum FocusCommand {
    Status,
    Set {
        minutes: u32,
    },
    Start {
        /// Open loop to work on during the block.
        #[arg(short = 'l', long = "loop")]
        loop_id: Option<String>,
    },
    Pause,
    Reset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Operator,
    Overload,
}

impl From<ModeArg> for Mode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Operator => Mode::Operator,
            ModeArg::Overload => Mode::Overload,
        }
    }
}

/// Execute a CLI command against the store, printing to stdout.
pub fn run(command: Command, store: &Store) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    execute(command, store, Local::now(), &mut stdout)
}

fn execute(
    command: Command,
    store: &Store,
    now: DateTime<Local>,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Command::Loop { command } => handle_loop(command, store, now, out)?,
        Command::Entry { command } => handle_entry(command, store, now, out)?,
        Command::Idea { command } => handle_idea(command, store, now, out)?,
        Command::Mode { mode } => handle_mode(mode, store, out)?,
        Command::Focus { command } => handle_focus(command, store, now, out)?,
        Command::Export { out: path } => handle_export(path, store, now, out)?,
    }
    Ok(())
}

/// Matches a full id or an unambiguous id prefix.
fn resolve_id<T: Record>(items: &[T], query: &str) -> Option<String> {
    if let Some(item) = items.iter().find(|item| item.id() == query) {
        return Some(item.id().to_string());
    }
    let mut matches = items.iter().filter(|item| item.id().starts_with(query));
    match (matches.next(), matches.next()) {
        (Some(item), None) if !query.is_empty() => Some(item.id().to_string()),
        _ => None,
    }
}

fn handle_loop(
    command: LoopCommand,
    store: &Store,
    now: DateTime<Local>,
    out: &mut impl Write,
) -> Result<()> {
    let mut loops = Loops::load(store);
    match command {
        LoopCommand::Add { title, criterion } => {
            match loops.create(&title, criterion.as_deref().unwrap_or(""), now, store) {
                Some(id) => writeln!(out, "Opened loop {id}")?,
                None => writeln!(out, "Loop title must not be blank.")?,
            }
        }
        LoopCommand::Done { id } => {
            let Some(id) = resolve_id(loops.list(), &id) else {
                writeln!(out, "Loop '{id}' not found")?;
                return Ok(());
            };
            loops.complete(&id, now, store);
            let mut focus = FocusTimer::load(store);
            if focus.sync_loop(&loops, store) {
                writeln!(out, "Focus block is no longer tied to a loop.")?;
            }
            writeln!(out, "Closed loop {id}")?;
        }
        LoopCommand::Reopen { id } => {
            let Some(id) = resolve_id(loops.list(), &id) else {
                writeln!(out, "Loop '{id}' not found")?;
                return Ok(());
            };
            loops.reopen(&id, store);
            writeln!(out, "Reopened loop {id}")?;
        }
        LoopCommand::Rm { id } => {
            let Some(id) = resolve_id(loops.list(), &id) else {
                writeln!(out, "Loop '{id}' not found")?;
                return Ok(());
            };
            loops.delete(&id, store);
            let mut focus = FocusTimer::load(store);
            if focus.sync_loop(&loops, store) {
                writeln!(out, "Focus block is no longer tied to a loop.")?;
            }
            writeln!(out, "Removed loop {id}")?;
        }
        LoopCommand::List { all } => {
            let visible = loops.visible(!all);
            if visible.is_empty() {
                writeln!(out, "No loops.")?;
            }
            for item in visible {
                let mark = if item.is_open() { "[ ]" } else { "[x]" };
                writeln!(out, "{mark} {}  {}", item.id, item.title)?;
                if !item.criterion.is_empty() {
                    writeln!(out, "      done when: {}", item.criterion)?;
                }
            }
        }
    }
    Ok(())
}

fn handle_entry(
    command: EntryCommand,
    store: &Store,
    now: DateTime<Local>,
    out: &mut impl Write,
) -> Result<()> {
    let mut entries = Entries::load(store);
    match command {
        EntryCommand::Add {
            output,
            fulfilled,
            date,
        } => match entries.create(&output, fulfilled, date, now, store) {
            Some(id) => writeln!(out, "Logged entry {id}")?,
            None => writeln!(out, "Entry output must not be blank.")?,
        },
        EntryCommand::List => {
            if entries.is_empty() {
                writeln!(out, "No entries.")?;
            }
            for entry in entries.list() {
                let mark = if entry.fulfilled { "✓" } else { "✗" };
                writeln!(out, "{} {mark} {}", entry.date, entry.output)?;
            }
        }
        EntryCommand::Clear => {
            let count = entries.len();
            entries.clear(store);
            writeln!(out, "Cleared {count} entries.")?;
        }
    }
    Ok(())
}

fn handle_idea(
    command: IdeaCommand,
    store: &Store,
    now: DateTime<Local>,
    out: &mut impl Write,
) -> Result<()> {
    let mut ideas = Ideas::load(store);
    match command {
        IdeaCommand::Add { title, notes } => {
            match ideas.create(&title, notes.as_deref().unwrap_or(""), now, store) {
                Some(id) => writeln!(out, "Parked idea {id}")?,
                None => writeln!(out, "Idea title must not be blank.")?,
            }
        }
        IdeaCommand::List => {
            if ideas.is_empty() {
                writeln!(out, "No ideas.")?;
            }
            for idea in ideas.list() {
                writeln!(out, "{}  {}", idea.id, idea.title)?;
                for note in idea.notes.lines().filter(|line| !line.trim().is_empty()) {
                    writeln!(out, "    {note}")?;
                }
            }
        }
        IdeaCommand::Rm { id } => {
            let Some(id) = resolve_id(ideas.list(), &id) else {
                writeln!(out, "Idea '{id}' not found")?;
                return Ok(());
            };
            ideas.delete(&id, store);
            writeln!(out, "Removed idea {id}")?;
        }
    }
    Ok(())
}

fn handle_mode(mode: Option<ModeArg>, store: &Store, out: &mut impl Write) -> Result<()> {
    let mode = match mode {
        Some(mode) => {
            let mode = Mode::from(mode);
            save_mode(mode, store);
            mode
        }
        None => load_mode(store),
    };
    writeln!(out, "Mode: {}", mode.label())?;
    for line in mode.guidance() {
        writeln!(out, "  - {line}")?;
    }
    Ok(())
}

fn handle_focus(
    command: FocusCommand,
    store: &Store,
    now: DateTime<Local>,
    out: &mut impl Write,
) -> Result<()> {
    let now_ms = now.timestamp_millis();
    let loops = Loops::load(store);
    let mut focus = FocusTimer::load(store);
    focus.sync_loop(&loops, store);
    if focus.restore_on_resume(now_ms, store).is_some() {
        writeln!(out, "The last focus block has finished.")?;
    }
    match command {
        FocusCommand::Status => {}
        FocusCommand::Set { minutes } => {
            if !(MIN_MINUTES..=MAX_MINUTES).contains(&minutes) {
                writeln!(
                    out,
                    "Block length is clamped to {MIN_MINUTES}-{MAX_MINUTES} minutes."
                )?;
            }
            focus.configure(minutes, store);
        }
        FocusCommand::Start { loop_id } => {
            if let Some(query) = loop_id {
                let selected = resolve_id(loops.list(), &query)
                    .is_some_and(|id| focus.select_loop(Some(id), &loops, store));
                if !selected {
                    writeln!(out, "Loop '{query}' is not open")?;
                    return Ok(());
                }
            }
            focus.start(now_ms, store);
        }
        FocusCommand::Pause => {
            if focus.pause(now_ms, store).is_some() {
                writeln!(out, "The focus block had already finished.")?;
            }
        }
        FocusCommand::Reset => focus.reset(now_ms, store),
    }
    write_focus_status(&focus, &loops, out)
}

fn write_focus_status(focus: &FocusTimer, loops: &Loops, out: &mut impl Write) -> Result<()> {
    let phase = match focus.phase() {
        FocusPhase::Idle => "ready",
        FocusPhase::Paused => "paused",
        FocusPhase::Running => "running",
        FocusPhase::Expired => "done",
    };
    let remaining = focus.remaining_sec();
    writeln!(
        out,
        "Focus {phase}: {:02}:{:02} left of {} min",
        remaining / 60,
        remaining % 60,
        focus.minutes()
    )?;
    if let Some(item) = focus.loop_id().and_then(|id| loops.get(id)) {
        writeln!(out, "Working on: {}", item.title)?;
    }
    Ok(())
}

fn handle_export(
    path: Option<PathBuf>,
    store: &Store,
    now: DateTime<Local>,
    out: &mut impl Write,
) -> Result<()> {
    let entries = Entries::load(store);
    let ideas = Ideas::load(store);
    let text = export::render_export(entries.list(), ideas.list(), now);
    match path {
        Some(path) => {
            export::write_export(&path, &text)?;
            writeln!(out, "Exported to {}", path.display())?;
        }
        None => write!(out, "{text}")?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    fn at(hour: u32, minute: u32, second: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 5, 6, hour, minute, second)
            .single()
            .unwrap()
    }

    fn exec(command: Command, store: &Store, now: DateTime<Local>) -> String {
        let mut out = Vec::new();
        execute(command, store, now, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn parse(args: &[&str]) -> Command {
        let mut argv = vec!["loopos"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().command.unwrap()
    }

    #[test]
    fn parses_global_options_anywhere() {
        let cli = Cli::try_parse_from(["loopos", "loop", "list", "--data-dir", "/tmp/x"]).unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
        assert!(matches!(
            cli.command,
            Some(Command::Loop {
                command: LoopCommand::List { all: false }
            })
        ));
    }

    #[test]
    fn loop_round_trip_against_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loopos.db");
        {
            let store = Store::open(&path).unwrap();
            let output = exec(
                parse(&["loop", "add", "Send invoice", "--done-when", "paid"]),
                &store,
                at(9, 0, 0),
            );
            assert!(output.starts_with("Opened loop "));
        }

        let store = Store::open(&path).unwrap();
        let loops = Loops::load(&store);
        let id = loops.list()[0].id.clone();
        let listed = exec(parse(&["loop", "list"]), &store, at(9, 1, 0));
        assert_eq!(
            listed,
            format!("[ ] {id}  Send invoice\n      done when: paid\n")
        );

        exec(parse(&["loop", "done", &id]), &store, at(9, 2, 0));
        assert_eq!(exec(parse(&["loop", "list"]), &store, at(9, 3, 0)), "No loops.\n");
        let all = exec(parse(&["loop", "list", "--all"]), &store, at(9, 3, 0));
        assert!(all.starts_with("[x] "));
    }

    #[test]
    fn unknown_ids_print_a_message() {
        let store = Store::open_in_memory().unwrap();
        let output = exec(parse(&["loop", "done", "nope"]), &store, at(9, 0, 0));
        assert_eq!(output, "Loop 'nope' not found\n");
        let output = exec(parse(&["idea", "rm", "nope"]), &store, at(9, 0, 0));
        assert_eq!(output, "Idea 'nope' not found\n");
    }

    #[test]
    fn prefix_must_be_unambiguous() {
        let store = Store::open_in_memory().unwrap();
        let mut loops = Loops::load(&store);
        let first = loops.create("a", "", at(9, 0, 0), &store).unwrap();
        let second = loops.create("b", "", at(9, 0, 0), &store).unwrap();
        let shared: String = first
            .chars()
            .zip(second.chars())
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| a)
            .collect();
        assert_eq!(resolve_id(loops.list(), &shared), None);
        assert_eq!(resolve_id(loops.list(), &first), Some(first.clone()));
        assert_eq!(resolve_id(loops.list(), ""), None);
    }

    #[test]
    fn closing_the_focus_loop_unsets_it() {
        let store = Store::open_in_memory().unwrap();
        exec(parse(&["loop", "add", "Deep work"]), &store, at(9, 0, 0));
        let id = Loops::load(&store).list()[0].id.clone();

        let status = exec(
            parse(&["focus", "start", "--loop", &id]),
            &store,
            at(9, 0, 0),
        );
        assert_eq!(status, "Focus running: 25:00 left of 25 min\nWorking on: Deep work\n");

        let output = exec(parse(&["loop", "done", &id]), &store, at(9, 5, 0));
        assert!(output.contains("no longer tied"));
        assert_eq!(FocusTimer::load(&store).loop_id(), None);
    }

    #[test]
    fn focus_survives_between_invocations() {
        let store = Store::open_in_memory().unwrap();
        exec(parse(&["focus", "set", "10"]), &store, at(9, 0, 0));
        exec(parse(&["focus", "start"]), &store, at(9, 0, 0));

        let paused = exec(parse(&["focus", "pause"]), &store, at(9, 4, 0));
        assert_eq!(paused, "Focus paused: 06:00 left of 10 min\n");

        exec(parse(&["focus", "start"]), &store, at(10, 0, 0));
        let finished = exec(parse(&["focus", "status"]), &store, at(10, 7, 0));
        assert_eq!(
            finished,
            "The last focus block has finished.\nFocus done: 00:00 left of 10 min\n"
        );

        let reset = exec(parse(&["focus", "reset"]), &store, at(10, 8, 0));
        assert_eq!(reset, "Focus ready: 10:00 left of 10 min\n");
    }

    #[test]
    fn focus_set_reports_clamping() {
        let store = Store::open_in_memory().unwrap();
        let output = exec(parse(&["focus", "set", "500"]), &store, at(9, 0, 0));
        assert!(output.starts_with("Block length is clamped"));
        assert_eq!(FocusTimer::load(&store).minutes(), MAX_MINUTES);
    }

    #[test]
    fn starting_on_a_closed_loop_is_refused() {
        let store = Store::open_in_memory().unwrap();
        let output = exec(
            parse(&["focus", "start", "--loop", "missing"]),
            &store,
            at(9, 0, 0),
        );
        assert_eq!(output, "Loop 'missing' is not open\n");
        assert!(!FocusTimer::load(&store).is_running());
    }

    #[test]
    fn mode_is_shown_and_set() {
        let store = Store::open_in_memory().unwrap();
        let shown = exec(parse(&["mode"]), &store, at(9, 0, 0));
        assert!(shown.starts_with("Mode: operator\n"));
        let set = exec(parse(&["mode", "overload"]), &store, at(9, 0, 0));
        assert!(set.starts_with("Mode: overload\n"));
        assert_eq!(load_mode(&store), Mode::Overload);
    }

    #[test]
    fn entries_and_ideas_list_and_export() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open_in_memory().unwrap();
        exec(
            parse(&["entry", "add", "Shipped v1", "--fulfilled", "--date", "2024-05-01"]),
            &store,
            at(9, 0, 0),
        );
        exec(
            parse(&["idea", "add", "Dark mode", "--notes", "maybe later"]),
            &store,
            at(9, 0, 0),
        );
        assert_eq!(
            exec(parse(&["entry", "list"]), &store, at(9, 0, 0)),
            "2024-05-01 ✓ Shipped v1\n"
        );
        let ideas = exec(parse(&["idea", "list"]), &store, at(9, 0, 0));
        assert!(ideas.ends_with("  Dark mode\n    maybe later\n"));

        let target = dir.path().join("out/export.txt");
        let target_arg = target.to_string_lossy().to_string();
        exec(parse(&["export", "--out", &target_arg]), &store, at(9, 30, 0));
        let written = std::fs::read_to_string(&target).unwrap();
        assert!(written.starts_with("LoopOS export · 2024-05-06 09:30\n"));
        assert!(written.contains("2024-05-01 | ✓ | Shipped v1"));

        assert_eq!(
            exec(parse(&["entry", "clear"]), &store, at(9, 0, 0)),
            "Cleared 1 entries.\n"
        );
        assert!(Entries::load(&store).is_empty());
    }

    #[test]
    fn blank_input_is_reported() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(
            exec(parse(&["loop", "add", "   "]), &store, at(9, 0, 0)),
            "Loop title must not be blank.\n"
        );
        assert!(Loops::load(&store).is_empty());
    }
}
