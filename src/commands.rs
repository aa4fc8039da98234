use crate::{OutputMode, emit_success};
use owo_colors::OwoColorize;
use qrscan::config::{self, QrscanConfig};
use qrscan::scan::{self, FlowOutcome, ScanFlow, ScanLock};
use qrscan::ui::{self, Icons, banner, section, success};
use qrscan::{Error, SqliteStore};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Everything a subcommand needs: resolved config, database path, output mode
pub struct Context {
    pub output_mode: OutputMode,
    pub config: QrscanConfig,
    pub database: PathBuf,
}

impl Context {
    pub fn load(config_path: Option<&Path>, database: Option<&Path>, output_mode: OutputMode) -> anyhow::Result<Self> {
        let config = config::load_config(config_path)?.unwrap_or_default();
        let cwd = std::env::current_dir()?;
        let database = config.resolve_database(database, &cwd);
        Ok(Self { output_mode, config, database })
    }

    pub fn open_store(&self) -> anyhow::Result<SqliteStore> {
        config::ensure_db_dir(&self.database)?;
        tracing::debug!("Opening database {}", self.database.display());
        Ok(SqliteStore::open(&self.database)?)
    }

    fn session_name(&self, name: Option<String>) -> String {
        name.unwrap_or_else(|| scan::default_session_name(self.config.session_prefix(), chrono::Local::now()))
    }

    fn require_session(&self, store: &SqliteStore, session_id: &str) -> anyhow::Result<qrscan::Session> {
        store
            .get_session(session_id)?
            .ok_or_else(|| Error::SessionNotFound(session_id.to_string()).into())
    }
}

pub fn run_init(ctx: &Context, config_path: Option<&Path>, force: bool) -> anyhow::Result<()> {
    let path = config_path.map(Path::to_path_buf).unwrap_or_else(config::default_config_path);
    let written = QrscanConfig {
        database: Some(ctx.database.display().to_string()),
        ..ctx.config.clone()
    };
    config::write_config(&path, &written, force)?;
    let store = ctx.open_store()?;
    let stats = store.stats()?;

    if ctx.output_mode.is_human() {
        success(&format!("Wrote {}", path.display()));
        ui::info("Database", &ctx.database.display().to_string());
    } else {
        emit_success(ctx.output_mode, "init", serde_json::json!({
            "config": path.display().to_string(),
            "database": ctx.database.display().to_string(),
            "stats": stats,
        }))?;
    }
    Ok(())
}

pub fn run_new(ctx: &Context, name: Option<String>) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let name = ctx.session_name(name);
    let id = store.create_session(&name)?;

    if ctx.output_mode.is_human() {
        success(&format!("Created session '{}'", name));
        println!("{}", id);
    } else {
        emit_success(ctx.output_mode, "new", serde_json::json!({ "id": id, "name": name }))?;
    }
    Ok(())
}

pub fn run_add(ctx: &Context, session_id: &str, texts: &[String]) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    ctx.require_session(&store, session_id)?;

    let saved = if ctx.config.atomic_saves() {
        store.save_qr_codes_atomic(session_id, texts)?
    } else {
        store.save_qr_codes(session_id, texts)?
    };

    if ctx.output_mode.is_human() {
        success(&format!("Saved {} code(s)", saved));
    } else {
        emit_success(ctx.output_mode, "add", serde_json::json!({ "session": session_id, "saved": saved }))?;
    }
    Ok(())
}

pub fn run_sessions(ctx: &Context) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let sessions = store.get_sessions()?;

    if ctx.output_mode.is_human() {
        if sessions.is_empty() {
            println!("∅ No sessions yet.");
        } else {
            println!("{}", ui::sessions_table(&sessions));
        }
    } else {
        emit_success(ctx.output_mode, "sessions", serde_json::to_value(&sessions)?)?;
    }
    Ok(())
}

pub fn run_codes(ctx: &Context, session_id: &str) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let session = ctx.require_session(&store, session_id)?;
    let codes = store.get_qr_codes_by_session(session_id)?;

    if ctx.output_mode.is_human() {
        ui::header(&session.name);
        if codes.is_empty() {
            println!("∅ No codes in this session.");
        } else {
            println!("{}", ui::codes_table(&codes));
        }
    } else {
        emit_success(ctx.output_mode, "codes", serde_json::json!({ "session": session, "codes": codes }))?;
    }
    Ok(())
}

pub fn run_rename(ctx: &Context, session_id: &str, name: &str) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let changed = store.edit_session_name(session_id, name)?;
    if changed == 0 {
        return Err(Error::SessionNotFound(session_id.to_string()).into());
    }

    if ctx.output_mode.is_human() {
        println!("{} Renamed to '{}'", Icons::PENCIL, name.bold());
    } else {
        emit_success(ctx.output_mode, "rename", serde_json::json!({ "id": session_id, "name": name, "changes": changed }))?;
    }
    Ok(())
}

pub fn run_delete(ctx: &Context, session_id: &str) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let session = ctx.require_session(&store, session_id)?;
    let codes = store.count_qr_codes(session_id)?;
    store.delete_session(session_id)?;

    if ctx.output_mode.is_human() {
        println!("{} Deleted '{}' and {} code(s)", Icons::DEL, session.name, codes);
    } else {
        emit_success(ctx.output_mode, "delete", serde_json::json!({ "id": session_id, "codes": codes }))?;
    }
    Ok(())
}

pub fn run_history(ctx: &Context) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let history = qrscan::load_history(&store)?;

    if ctx.output_mode.is_human() {
        if history.is_empty() {
            println!("∅ No sessions yet.");
        }
        for entry in &history {
            println!();
            ui::session_line(&entry.session, entry.codes.len());
            for code in &entry.codes {
                ui::code_line(code);
            }
        }
    } else {
        emit_success(ctx.output_mode, "history", serde_json::to_value(&history)?)?;
    }
    Ok(())
}

/// Drive a `ScanFlow` from line input.
///
/// Each line is one detection. Duplicates are dropped; a debounce applies
/// only when `--cooldown-ms` or `cooldown_ms` in the config sets one.
/// `:undo <text>` drops a pending payload and `:resume` releases the lock.
/// End of input sends the buffer and closes the flow; a flow that saved
/// nothing removes its session.
pub fn run_scan<R: BufRead>(ctx: &Context, name: Option<String>, cooldown_ms: Option<u64>, input: R) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    // Lines are deliberate detections, so no debounce unless one is asked for.
    let cooldown = cooldown_ms
        .or(ctx.config.cooldown_ms)
        .map(Duration::from_millis)
        .unwrap_or(Duration::ZERO);
    let name = ctx.session_name(name);
    let mut flow = ScanFlow::begin(&store, &name)?
        .with_lock(ScanLock::new(cooldown))
        .with_atomic_saves(ctx.config.atomic_saves());

    let human = ctx.output_mode.is_human();
    if human {
        banner(&name, &format!("{} Reading payloads, one per line. End input to save.", Icons::CAMERA));
    }

    let mut ignored = 0usize;
    for line in input.lines() {
        let line = line?;
        let line = line.trim_end_matches(['\r', '\n']);
        if let Some(text) = line.strip_prefix(":undo ") {
            if flow.remove(text) && human {
                println!("{} {}", Icons::DEL, ui::dim(text));
            }
        } else if line == ":resume" {
            flow.resume();
        } else if flow.on_scanned(line, Instant::now()) {
            if human {
                println!("{} {}", Icons::QR, line);
            }
        } else {
            ignored += 1;
            tracing::debug!("Ignored detection '{}'", line);
            if human && !line.is_empty() {
                ui::warn(&format!("Ignored '{}' (duplicate or within cooldown)", line));
            }
        }
    }

    let sent = match flow.send() {
        Ok(saved) => Ok(saved),
        Err(Error::NothingScanned) => Ok(0),
        Err(e) => Err(e),
    };
    let session_id = flow.session_id().to_string();
    let outcome = flow.finish()?;
    let saved = sent?;

    if human {
        section("Summary");
        match outcome {
            FlowOutcome::Kept { codes } => {
                success(&format!("Saved {} code(s) in '{}'", saved, name));
                ui::info("Session", &session_id);
                ui::info("Total codes", &codes.to_string());
                if ignored > 0 {
                    ui::info("Ignored lines", &ignored.to_string());
                }
            }
            FlowOutcome::Discarded => ui::warn("Nothing scanned, session discarded."),
        }
    } else {
        emit_success(ctx.output_mode, "scan", serde_json::json!({
            "session": session_id,
            "name": name,
            "saved": saved,
            "ignored": ignored,
            "result": outcome,
        }))?;
    }
    Ok(())
}

pub fn run_stats(ctx: &Context) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let stats = store.stats()?;

    if ctx.output_mode.is_human() {
        println!("{} {}", Icons::STATS, ctx.database.display());
        println!("{}", ui::stats_table(&stats));
    } else {
        emit_success(ctx.output_mode, "stats", serde_json::to_value(&stats)?)?;
    }
    Ok(())
}

pub fn run_version(output_mode: OutputMode) -> anyhow::Result<()> {
    if output_mode.is_human() {
        banner("qrscan", &format!("Version {}", env!("CARGO_PKG_VERSION").bold()));
    } else {
        emit_success(output_mode, "version", serde_json::json!({ "version": env!("CARGO_PKG_VERSION") }))?;
    }
    Ok(())
}
