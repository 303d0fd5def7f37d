use gtk4::prelude::*;
use gtk4::{glib, Box as GtkBox, Button, CheckButton, Label, Orientation, Window};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::activity::Activity;
use crate::config::DialogConfig;
use crate::format::format_hours;
use crate::keybindings::Action;
use crate::stopwatch::Stopwatch;
use crate::ui::modal::{dialog_button, dialog_window, on_action, run_modal};

/// How a stopwatch session ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StopwatchOutcome {
    /// Finished before the balance, with the elapsed hours
    Elapsed(f64),
    /// Elapsed time ended up equal to the activity balance
    LimitReached,
}

impl StopwatchOutcome {
    /// Compares with exact float equality. Balances that are not a whole
    /// number of seconds never compare equal, even when the stopwatch stopped
    /// at its limit.
    #[allow(clippy::float_cmp)]
    pub fn resolve(elapsed_hours: f64, balance: f64) -> Self {
        if elapsed_hours == balance {
            StopwatchOutcome::LimitReached
        } else {
            StopwatchOutcome::Elapsed(elapsed_hours)
        }
    }
}

/// Stopwatch for `activity`, capped at its balance when `auto_stop` is set
/// and there is a balance left.
pub fn stopwatch_for<A: Activity + ?Sized>(activity: &A, auto_stop: bool, interval: Duration) -> Stopwatch {
    if auto_stop && activity.has_budget() {
        Stopwatch::with_limit_hours(activity.balance(), interval)
    } else {
        Stopwatch::with_interval(None, interval)
    }
}

fn render_elapsed(stopwatch: &Stopwatch) -> String {
    format_hours(-stopwatch.elapsed_hours(), true)
}

/// Window showing the time spent on an activity against its balance, with
/// pause and finish controls.
pub struct StopwatchDialog {
    pub window: Window,
    elapsed_label: Label,
    stopwatch: Arc<Stopwatch>,
    refresh_interval: Duration,
    refresh_source: Rc<RefCell<Option<glib::SourceId>>>,
}

impl StopwatchDialog {
    pub fn new<A: Activity + ?Sized>(activity: &A, auto_stop: bool, config: &DialogConfig) -> Self {
        let stopwatch = Arc::new(stopwatch_for(activity, auto_stop, config.tick_interval()));

        let (window, main_box) =
            dialog_window(&config.window_title(&format!("Activity: {}", activity.name())));

        let row = GtkBox::new(Orientation::Horizontal, 8);

        let caption = Label::new(Some("Elapsed/Balance: "));
        caption.add_css_class("caption");
        caption.set_halign(gtk4::Align::Start);
        caption.set_hexpand(true);

        let elapsed_label = Label::new(Some(render_elapsed(&stopwatch).as_str()));
        elapsed_label.add_css_class("elapsed-time");
        elapsed_label.set_hexpand(true);

        let balance_label = Label::new(Some(format!("/ {}", format_hours(activity.balance(), false)).as_str()));
        balance_label.add_css_class("balance-time");
        balance_label.set_hexpand(true);

        let pause_btn = CheckButton::with_label("Pause");
        let finish_btn = dialog_button("Finish");
        finish_btn.add_css_class("finish-button");

        row.append(&caption);
        row.append(&elapsed_label);
        row.append(&balance_label);
        row.append(&pause_btn);
        row.append(&finish_btn);
        main_box.append(&row);

        let dialog = Self {
            window,
            elapsed_label,
            stopwatch,
            refresh_interval: config.refresh_interval(),
            refresh_source: Rc::new(RefCell::new(None)),
        };

        dialog.setup_controls(&pause_btn, &finish_btn);
        dialog
    }

    fn setup_controls(&self, pause_btn: &CheckButton, finish_btn: &Button) {
        let stopwatch = self.stopwatch.clone();
        let elapsed_label = self.elapsed_label.clone();
        pause_btn.connect_toggled(move |_| {
            if stopwatch.toggle_pause() {
                elapsed_label.add_css_class("paused");
            } else {
                elapsed_label.remove_css_class("paused");
            }
        });

        let stopwatch = self.stopwatch.clone();
        let window = self.window.clone();
        finish_btn.connect_clicked(move |_| {
            stopwatch.stop();
            window.close();
        });

        // Closing the window is the same as pressing finish
        let stopwatch = self.stopwatch.clone();
        self.window.connect_close_request(move |_| {
            stopwatch.stop();
            glib::Propagation::Proceed
        });

        let refresh_source = self.refresh_source.clone();
        self.window.connect_destroy(move |_| {
            if let Some(source) = refresh_source.borrow_mut().take() {
                source.remove();
            }
        });

        let pause_btn = pause_btn.clone();
        on_action(&self.window, Action::TogglePause, move || {
            pause_btn.set_active(!pause_btn.is_active());
        });

        let finish_btn = finish_btn.clone();
        on_action(&self.window, Action::Finish, move || {
            finish_btn.emit_clicked();
        });
    }

    /// Starts the stopwatch and the label refresh.
    pub fn start(&self) {
        self.stopwatch.start();
        self.schedule_refresh();
    }

    /// Redraws the elapsed label until the stopwatch stops, then closes the
    /// window.
    fn schedule_refresh(&self) {
        if self.refresh_source.borrow().is_some() {
            return;
        }

        let stopwatch = self.stopwatch.clone();
        let elapsed_label = self.elapsed_label.clone();
        let window = self.window.clone();
        let refresh_source = self.refresh_source.clone();

        let source = glib::timeout_add_local(self.refresh_interval, move || {
            elapsed_label.set_text(&render_elapsed(&stopwatch));

            if stopwatch.is_stopped() {
                refresh_source.borrow_mut().take();
                window.close();
                return glib::ControlFlow::Break;
            }
            glib::ControlFlow::Continue
        });

        *self.refresh_source.borrow_mut() = Some(source);
    }

    pub fn stopwatch(&self) -> &Arc<Stopwatch> {
        &self.stopwatch
    }
}

/// Run a stopwatch for `activity` until the user finishes it or the balance
/// runs out.
pub fn stopwatch_dialog<A: Activity + ?Sized>(
    activity: &A,
    auto_stop: bool,
    config: &DialogConfig,
) -> StopwatchOutcome {
    let dialog = StopwatchDialog::new(activity, auto_stop, config);
    dialog.start();
    run_modal(&dialog.window);

    let elapsed = dialog.stopwatch().elapsed_hours();
    let outcome = StopwatchOutcome::resolve(elapsed, activity.balance());
    info!(
        activity = activity.name(),
        elapsed_seconds = dialog.stopwatch().elapsed_seconds(),
        ?outcome,
        "stopwatch finished"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::ActivityRecord;

    fn finish(stopwatch: &Stopwatch, ticks: usize) {
        for _ in 0..ticks {
            if stopwatch.tick().is_break() {
                break;
            }
        }
    }

    #[test]
    fn test_full_hour_reports_limit_reached() {
        // `stopwatch_dialog` is `stopwatch_for`, the GTK run, then `resolve`
        let activity = ActivityRecord::new("Support", 1.0);
        let stopwatch = stopwatch_for(&activity, true, Duration::from_secs(1));
        finish(&stopwatch, 3600);

        assert!(stopwatch.is_stopped());
        assert_eq!(
            StopwatchOutcome::resolve(stopwatch.elapsed_hours(), activity.balance()),
            StopwatchOutcome::LimitReached
        );
    }

    #[test]
    fn test_finishing_early_reports_elapsed() {
        let activity = ActivityRecord::new("Support", 1.0);
        let stopwatch = stopwatch_for(&activity, true, Duration::from_secs(1));
        finish(&stopwatch, 1800);
        stopwatch.stop();

        assert_eq!(
            StopwatchOutcome::resolve(stopwatch.elapsed_hours(), activity.balance()),
            StopwatchOutcome::Elapsed(0.5)
        );
    }

    #[test]
    fn test_balance_off_the_second_grid_is_not_reported_as_limit() {
        let activity = ActivityRecord::new("Review", 0.1234);
        let stopwatch = stopwatch_for(&activity, true, Duration::from_secs(1));
        finish(&stopwatch, 10_000);

        assert!(stopwatch.is_stopped());
        assert_eq!(stopwatch.elapsed_seconds(), 444);
        assert!(matches!(
            StopwatchOutcome::resolve(stopwatch.elapsed_hours(), activity.balance()),
            StopwatchOutcome::Elapsed(_)
        ));
    }

    #[test]
    fn test_no_auto_stop_has_no_limit() {
        let activity = ActivityRecord::new("Support", 1.0);
        assert_eq!(stopwatch_for(&activity, false, Duration::from_secs(1)).limit(), None);
    }

    #[test]
    fn test_no_budget_has_no_limit() {
        for saldo in [0.0, -2.5] {
            let activity = ActivityRecord::new("Overdrawn", saldo);
            assert_eq!(stopwatch_for(&activity, true, Duration::from_secs(1)).limit(), None);
        }
    }

    #[test]
    fn test_elapsed_rendered_as_negative_time() {
        let stopwatch = Stopwatch::new(None);
        assert_eq!(render_elapsed(&stopwatch), "00:00:00");
        finish(&stopwatch, 65);
        assert_eq!(render_elapsed(&stopwatch), "-00:01:05");
    }
}
