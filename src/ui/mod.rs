mod dialogs;
mod modal;
mod stopwatch_dialog;
mod time_entry;

pub use dialogs::{ask, choose, choose_file, enter, menu, notify, Entered, EntryKind};
pub use modal::init;
pub use stopwatch_dialog::{stopwatch_dialog, stopwatch_for, StopwatchDialog, StopwatchOutcome};
pub use time_entry::{time_entry, TimeEntry, TimeEntryState};
