use anyhow::Context;
use gtk4::prelude::*;
use gtk4::{glib, Application};
use tracing::{error, info};

use tally::colors::ColorConfig;
use tally::duration_parser::parse_budget;
use tally::format::format_hours;
use tally::keybindings::Keybindings;
use tally::ui::{self, Entered, EntryKind, StopwatchOutcome};
use tally::{activity, ActivityRecord, DialogConfig};

const TRACK: &str = "Track";
const LOG_TIME: &str = "Log time";
const IMPORT: &str = "Import";
const QUIT: &str = "Quit";
const NEW_ACTIVITY: &str = "New activity...";

fn main() -> glib::ExitCode {
    tally::logging::init();

    let app = Application::builder()
        .application_id("com.tally.timer")
        .build();

    app.connect_activate(|app| {
        // Dialogs are not attached to the application; keep it alive while they run.
        let _hold = app.hold();
        if let Err(e) = run() {
            error!(error = %e, "tally failed");
        }
    });

    app.run()
}

fn run() -> anyhow::Result<()> {
    let config = DialogConfig::load();
    ui::init(&ColorConfig::load(), Keybindings::load()).context("setting up dialogs")?;

    let mut activities: Vec<ActivityRecord> = Vec::new();

    loop {
        let choice = ui::menu("What do you want to do?", &[TRACK, LOG_TIME, IMPORT, QUIT], &config);
        match choice.as_deref() {
            Some(TRACK) => track(&mut activities, &config),
            Some(LOG_TIME) => log_time(&config),
            Some(IMPORT) => import(&mut activities, &config),
            _ => break,
        }
    }

    info!("bye");
    Ok(())
}

fn track(activities: &mut Vec<ActivityRecord>, config: &DialogConfig) {
    let Some(index) = pick_activity(activities, config) else {
        return;
    };
    let activity = &activities[index];

    let auto_stop = config.auto_stop
        && activity.saldo > 0.0
        && ui::ask(
            &format!("Stop automatically after {}?", format_hours(activity.saldo, false)),
            config,
        );

    match ui::stopwatch_dialog(activity, auto_stop, config) {
        StopwatchOutcome::LimitReached => ui::notify(
            &format!("Time is up for \"{}\".", activity.name),
            config,
        ),
        StopwatchOutcome::Elapsed(hours) => ui::notify(
            &format!("Spent {} on \"{}\".", format_hours(hours, true), activity.name),
            config,
        ),
    }
}

/// Index of the activity to track, creating one when asked to.
fn pick_activity(activities: &mut Vec<ActivityRecord>, config: &DialogConfig) -> Option<usize> {
    if !activities.is_empty() {
        let mut options: Vec<String> = activities.iter().map(ActivityRecord::label).collect();
        options.push(NEW_ACTIVITY.to_string());

        let chosen = ui::choose("Which activity?", &options, config)?;
        if let Some(index) = options.iter().position(|o| *o == chosen) {
            if index < activities.len() {
                return Some(index);
            }
        }
    }

    let activity = new_activity(config)?;
    activities.push(activity);
    Some(activities.len() - 1)
}

fn new_activity(config: &DialogConfig) -> Option<ActivityRecord> {
    let Entered::Text(text) = ui::enter(
        "Activity name. Add a budget with [budget:1h30m] or [b:1:30].",
        EntryKind::Text,
        config,
    )?
    else {
        return None;
    };

    let (name, budget) = parse_budget(&text);
    if name.is_empty() {
        ui::notify("An activity needs a name.", config);
        return None;
    }

    let saldo = match budget {
        Some(hours) => hours,
        None => match ui::enter(
            &format!("Budget for \"{}\" in minutes (0 for none)", name),
            EntryKind::Integer { min: 0, max: 24 * 60 },
            config,
        )? {
            Entered::Integer(minutes) => f64::from(minutes) / 60.0,
            Entered::Text(_) => 0.0,
        },
    };

    Some(ActivityRecord::new(name, saldo))
}

fn log_time(config: &DialogConfig) {
    match ui::time_entry("How much time do you want to debit?", config) {
        Some(entry) => ui::notify(
            &format!("Debited {}.", format_hours(entry.as_hours(), true)),
            config,
        ),
        None => ui::notify("Nothing was debited.", config),
    }
}

fn import(activities: &mut Vec<ActivityRecord>, config: &DialogConfig) {
    let Some(path) = ui::choose_file("Import activities", "json", config) else {
        return;
    };

    match activity::load_activities(&path) {
        Ok(loaded) => {
            info!(count = loaded.len(), path = %path.display(), "activities imported");
            ui::notify(&format!("Imported {} activities.", loaded.len()), config);
            activities.extend(loaded);
        }
        Err(e) => {
            error!(error = %e, "import failed");
            ui::notify(&e.to_string(), config);
        }
    }
}
