use gtk4::prelude::*;
use gtk4::{gdk, glib, Box as GtkBox, Button, EventControllerKey, Orientation, Window};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, warn};

use crate::colors::ColorConfig;
use crate::error::Result;
use crate::keybindings::{Action, Keybindings};

thread_local! {
    static KEYBINDINGS: RefCell<Rc<Keybindings>> = RefCell::new(Rc::new(Keybindings::default()));
}

/// Initialise GTK, install the stylesheet and the keyboard shortcuts used by
/// every dialog. Safe to call more than once.
pub fn init(colors: &ColorConfig, keybindings: Keybindings) -> Result<()> {
    gtk4::init()?;

    KEYBINDINGS.with(|k| *k.borrow_mut() = Rc::new(keybindings));

    let Some(display) = gdk::Display::default() else {
        warn!("no default display, skipping stylesheet");
        return Ok(());
    };

    let provider = gtk4::CssProvider::new();
    provider.load_from_data(&colors.generate_css());

    gtk4::style_context_add_provider_for_display(
        &display,
        &provider,
        gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );

    Ok(())
}

pub(crate) fn keybindings() -> Rc<Keybindings> {
    KEYBINDINGS.with(|k| k.borrow().clone())
}

/// Create an empty dialog window with the main container as its child.
pub(crate) fn dialog_window(title: &str) -> (Window, GtkBox) {
    let window = Window::builder()
        .title(title)
        .modal(true)
        .resizable(false)
        .build();

    let main_box = GtkBox::new(Orientation::Vertical, 8);
    main_box.add_css_class("main-container");
    main_box.set_margin_start(12);
    main_box.set_margin_end(12);
    main_box.set_margin_top(12);
    main_box.set_margin_bottom(12);

    window.set_child(Some(&main_box));
    (window, main_box)
}

pub(crate) fn dialog_button(label: &str) -> Button {
    let button = Button::with_label(label);
    button.add_css_class("dialog-button");
    button
}

/// Run `f` whenever a key bound to `action` is pressed inside `window`.
pub(crate) fn on_action<F>(window: &Window, action: Action, f: F)
where
    F: Fn() + 'static,
{
    let keys = keybindings();
    let key_controller = EventControllerKey::new();

    key_controller.connect_key_pressed(move |_, key, _, modifier| {
        if keys.matches(action, &key, modifier) {
            f();
            return glib::Propagation::Stop;
        }
        glib::Propagation::Proceed
    });

    window.add_controller(key_controller);
}

/// Show `window` and block the caller until it is destroyed.
///
/// The GLib main context keeps dispatching events inside a nested loop, so
/// timers and other windows stay alive while the caller waits.
pub(crate) fn run_modal(window: &Window) {
    let main_loop = glib::MainLoop::new(None, false);

    let quit_loop = main_loop.clone();
    window.connect_destroy(move |_| quit_loop.quit());

    let title = window.title().map(|t| t.to_string()).unwrap_or_default();
    debug!(%title, "modal dialog opened");

    window.present();
    main_loop.run();

    debug!(%title, "modal dialog closed");
}
