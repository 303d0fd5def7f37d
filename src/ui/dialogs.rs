//! Blocking helpers around small modal dialogs. Every helper takes the
//! dialog configuration for its window title and returns once the user
//! dismisses the window.

use gtk4::prelude::*;
use gtk4::{
    Box as GtkBox, Entry, FileChooserAction, FileChooserDialog, FileFilter, Label, ListBox,
    ListBoxRow, Orientation, ResponseType, ScrolledWindow, SelectionMode, SpinButton, Widget,
    Window,
};
use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;
use tracing::debug;

use crate::config::DialogConfig;
use crate::keybindings::Action;
use crate::ui::modal::{dialog_button, dialog_window, on_action, run_modal};

const OK: &str = "OK";
const CANCEL: &str = "Cancel";
const YES: &str = "Yes";
const NO: &str = "No";

/// What `enter` asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Text,
    Integer { min: i32, max: i32 },
}

/// Value typed into an `enter` dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entered {
    Text(String),
    Integer(i32),
}

/// Message, optional content widget and a row of buttons. Returns the label of
/// the pressed button, or `None` if the window was closed another way.
fn button_dialog(
    message: &str,
    buttons: &[&str],
    content: Option<&Widget>,
    config: &DialogConfig,
) -> Option<String> {
    let (window, main_box) = dialog_window(&config.title);
    let pressed: Rc<RefCell<Option<String>>> = Rc::new(RefCell::new(None));

    let message_label = Label::new(Some(message));
    message_label.add_css_class("message");
    message_label.set_wrap(true);
    message_label.set_max_width_chars(60);
    main_box.append(&message_label);

    if let Some(content) = content {
        main_box.append(content);
    }

    let button_row = GtkBox::new(Orientation::Horizontal, 8);
    button_row.set_halign(gtk4::Align::Center);
    for label in buttons {
        let button = dialog_button(label);
        let pressed = pressed.clone();
        let window = window.clone();
        let label = label.to_string();
        button.connect_clicked(move |_| {
            *pressed.borrow_mut() = Some(label.clone());
            window.close();
        });
        button_row.append(&button);
    }
    main_box.append(&button_row);

    let cancel_window = window.clone();
    on_action(&window, Action::Cancel, move || cancel_window.close());

    run_modal(&window);

    let result = pressed.borrow_mut().take();
    debug!(?result, "button dialog closed");
    result
}

/// Show a message with an OK button.
pub fn notify(message: &str, config: &DialogConfig) {
    button_dialog(message, &[OK], None, config);
}

/// Yes/no question. Closing the window counts as no.
pub fn ask(question: &str, config: &DialogConfig) -> bool {
    button_dialog(question, &[YES, NO], None, config).as_deref() == Some(YES)
}

/// Ask for a line of text or an integer. `None` when cancelled.
pub fn enter(message: &str, kind: EntryKind, config: &DialogConfig) -> Option<Entered> {
    let activated = Rc::new(Cell::new(false));

    match kind {
        EntryKind::Text => {
            let entry = Entry::new();
            {
                let activated = activated.clone();
                entry.connect_activate(move |entry| {
                    activated.set(true);
                    close_root(entry);
                });
            }

            let pressed = button_dialog(message, &[OK, CANCEL], Some(entry.upcast_ref()), config);
            if pressed.as_deref() != Some(OK) && !activated.get() {
                return None;
            }
            Some(Entered::Text(entry.text().to_string()))
        }
        EntryKind::Integer { min, max } => {
            let spin = SpinButton::with_range(f64::from(min), f64::from(max), 1.0);
            spin.set_digits(0);
            spin.set_numeric(true);
            {
                let activated = activated.clone();
                spin.connect_activate(move |spin| {
                    activated.set(true);
                    close_root(spin);
                });
            }

            let pressed = button_dialog(message, &[OK, CANCEL], Some(spin.upcast_ref()), config);
            if pressed.as_deref() != Some(OK) && !activated.get() {
                return None;
            }
            spin.update();
            Some(Entered::Integer(spin.value_as_int()))
        }
    }
}

/// Close the window holding `widget`.
fn close_root(widget: &impl IsA<Widget>) {
    if let Some(window) = widget.root().and_then(|root| root.downcast::<Window>().ok()) {
        window.close();
    }
}

/// Pick one of `options`. `None` when cancelled or nothing is selected.
pub fn choose(message: &str, options: &[String], config: &DialogConfig) -> Option<String> {
    let list_box = ListBox::new();
    list_box.set_selection_mode(SelectionMode::Single);
    list_box.add_css_class("choice-list");

    for option in options {
        let row = ListBoxRow::new();
        row.add_css_class("choice-row");
        let label = Label::new(Some(option.as_str()));
        label.set_halign(gtk4::Align::Start);
        row.set_child(Some(&label));
        list_box.append(&row);
    }

    if let Some(first_row) = list_box.row_at_index(0) {
        list_box.select_row(Some(&first_row));
    }

    // Double click or Enter on a row picks it
    let activated = Rc::new(Cell::new(false));
    {
        let activated = activated.clone();
        list_box.connect_row_activated(move |list_box, _| {
            activated.set(true);
            close_root(list_box);
        });
    }

    let scrolled = ScrolledWindow::new();
    scrolled.set_min_content_height(200);
    scrolled.set_min_content_width(300);
    scrolled.set_child(Some(&list_box));

    let pressed = button_dialog(message, &[OK, CANCEL], Some(scrolled.upcast_ref()), config);
    if pressed.as_deref() != Some(OK) && !activated.get() {
        return None;
    }

    let index = list_box.selected_row()?.index();
    usize::try_from(index).ok().and_then(|i| options.get(i)).cloned()
}

/// Row of `buttons`; returns the label of the one pressed.
pub fn menu(message: &str, buttons: &[&str], config: &DialogConfig) -> Option<String> {
    button_dialog(message, buttons, None, config)
}

/// Native file chooser limited to `*.<extension>`.
#[allow(deprecated)]
pub fn choose_file(message: &str, extension: &str, config: &DialogConfig) -> Option<PathBuf> {
    let dialog = FileChooserDialog::new(
        Some(config.window_title(message).as_str()),
        None::<&Window>,
        FileChooserAction::Open,
        &[(CANCEL, ResponseType::Cancel), ("Open", ResponseType::Accept)],
    );
    dialog.set_modal(true);

    let filter = FileFilter::new();
    filter.add_pattern(&format!("*.{}", extension.trim_start_matches('.')));
    filter.set_name(Some(format!("{} files", extension.trim_start_matches('.')).as_str()));
    dialog.add_filter(&filter);

    let chosen: Rc<RefCell<Option<PathBuf>>> = Rc::new(RefCell::new(None));
    {
        let chosen = chosen.clone();
        dialog.connect_response(move |dialog, response| {
            if response == ResponseType::Accept {
                if let Some(file) = dialog.file() {
                    *chosen.borrow_mut() = file.path();
                }
            }
            dialog.close();
        });
    }

    run_modal(dialog.upcast_ref::<Window>());

    let result = chosen.borrow_mut().take();
    debug!(?result, "file chooser closed");
    result
}
