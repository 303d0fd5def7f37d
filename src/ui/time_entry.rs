use gtk4::prelude::*;
use gtk4::{Box as GtkBox, Grid, Label, SpinButton};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

use crate::config::DialogConfig;
use crate::keybindings::Action;
use crate::ui::modal::{dialog_button, dialog_window, on_action, run_modal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeEntry {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl TimeEntry {
    pub fn new(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self { hours, minutes, seconds }
    }

    pub fn total_seconds(&self) -> u64 {
        u64::from(self.hours) * 3600 + u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }

    pub fn as_hours(&self) -> f64 {
        self.total_seconds() as f64 / 3600.0
    }
}

/// Open → Confirmed | Dismissed. Both end states are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeEntryState {
    #[default]
    Open,
    Confirmed(TimeEntry),
    Dismissed,
}

impl TimeEntryState {
    pub fn confirm(&mut self, entry: TimeEntry) {
        if *self == TimeEntryState::Open {
            *self = TimeEntryState::Confirmed(entry);
        }
    }

    pub fn dismiss(&mut self) {
        if *self == TimeEntryState::Open {
            *self = TimeEntryState::Dismissed;
        }
    }

    pub fn value(&self) -> Option<TimeEntry> {
        match self {
            TimeEntryState::Confirmed(entry) => Some(*entry),
            TimeEntryState::Open | TimeEntryState::Dismissed => None,
        }
    }
}

fn spinner(max: u32) -> SpinButton {
    let spin = SpinButton::with_range(0.0, f64::from(max), 1.0);
    spin.set_digits(0);
    spin.set_numeric(true);
    spin
}

/// Ask for hours, minutes and seconds. Returns `None` when the window is
/// closed without pressing OK.
pub fn time_entry(message: &str, config: &DialogConfig) -> Option<TimeEntry> {
    let state = Rc::new(RefCell::new(TimeEntryState::Open));

    let (window, main_box) = dialog_window(&config.window_title("Debit"));

    let message_label = Label::new(Some(message));
    message_label.add_css_class("message");
    main_box.append(&message_label);

    let grid = Grid::new();
    grid.set_row_spacing(4);
    grid.set_column_spacing(8);

    let spins: Vec<SpinButton> = ["Hours: ", "Minutes: ", "Seconds: "]
        .into_iter()
        .enumerate()
        .map(|(row, caption)| {
            let label = Label::new(Some(caption));
            label.add_css_class("spin-label");
            label.set_halign(gtk4::Align::Start);

            let spin = spinner(config.spin_max);
            grid.attach(&label, 0, row as i32, 1, 1);
            grid.attach(&spin, 1, row as i32, 1, 1);
            spin
        })
        .collect();
    main_box.append(&grid);

    let buttons = GtkBox::new(gtk4::Orientation::Horizontal, 8);
    buttons.set_halign(gtk4::Align::Center);
    let ok_btn = dialog_button("OK");
    buttons.append(&ok_btn);
    main_box.append(&buttons);

    {
        let state = state.clone();
        let window = window.clone();
        let spins = spins.clone();
        ok_btn.connect_clicked(move |_| {
            // Pick up text typed but not yet committed
            for spin in &spins {
                spin.update();
            }
            let value = |i: usize| spins[i].value_as_int().max(0) as u32;
            state.borrow_mut().confirm(TimeEntry::new(value(0), value(1), value(2)));
            window.close();
        });
    }

    {
        let state = state.clone();
        window.connect_close_request(move |_| {
            state.borrow_mut().dismiss();
            gtk4::glib::Propagation::Proceed
        });
    }

    // A focused spinner consumes Return as `activate` before the window sees it
    for spin in &spins {
        let ok_btn = ok_btn.clone();
        spin.connect_activate(move |_| ok_btn.emit_clicked());
    }

    let confirm_btn = ok_btn.clone();
    on_action(&window, Action::Confirm, move || confirm_btn.emit_clicked());

    let cancel_window = window.clone();
    on_action(&window, Action::Cancel, move || cancel_window.close());

    run_modal(&window);

    let result = state.borrow().value();
    debug!(?result, "time entry closed");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_yields_entry() {
        let mut state = TimeEntryState::default();
        state.confirm(TimeEntry::new(2, 30, 15));
        assert_eq!(state.value(), Some(TimeEntry::new(2, 30, 15)));
    }

    #[test]
    fn test_dismiss_yields_nothing() {
        let mut state = TimeEntryState::default();
        state.dismiss();
        assert_eq!(state.value(), None);
    }

    #[test]
    fn test_open_has_no_value() {
        assert_eq!(TimeEntryState::Open.value(), None);
    }

    #[test]
    fn test_close_after_confirm_keeps_value() {
        // OK closes the window, which fires the close handler afterwards
        let mut state = TimeEntryState::default();
        state.confirm(TimeEntry::new(1, 0, 0));
        state.dismiss();
        assert_eq!(state, TimeEntryState::Confirmed(TimeEntry::new(1, 0, 0)));
    }

    #[test]
    fn test_confirm_after_dismiss_is_ignored() {
        let mut state = TimeEntryState::default();
        state.dismiss();
        state.confirm(TimeEntry::new(1, 0, 0));
        assert_eq!(state, TimeEntryState::Dismissed);
    }

    #[test]
    fn test_repeated_confirm_keeps_first_value() {
        // Return in a spinner and the window shortcut may both confirm
        let mut state = TimeEntryState::default();
        state.confirm(TimeEntry::new(0, 45, 0));
        state.confirm(TimeEntry::new(9, 9, 9));
        assert_eq!(state.value(), Some(TimeEntry::new(0, 45, 0)));
    }

    #[test]
    fn test_entry_conversions() {
        let entry = TimeEntry::new(2, 30, 15);
        assert_eq!(entry.total_seconds(), 9015);
        assert_eq!(TimeEntry::new(1, 45, 0).as_hours(), 1.75);
    }
}
