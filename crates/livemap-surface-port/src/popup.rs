// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Popup overlay options.

use alloc::string::String;

/// Presentation options for an anchored popup.
///
/// The status popup is passive: it stays open until the caller replaces or
/// hides it, so every dismissal behaviour defaults to off.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PopupOptions {
    /// Pixel offset from the anchor `[x, y]`.
    pub offset: [i32; 2],
    /// Maximum popup width in pixels.
    pub max_width: u32,
    /// CSS class applied to the popup container.
    pub class_name: String,
    /// Render a close button.
    pub close_button: bool,
    /// Close when another popup opens.
    pub auto_close: bool,
    /// Close on the Escape key.
    pub close_on_escape_key: bool,
    /// Close when the map is clicked.
    pub close_on_click: bool,
    /// Accept pointer events.
    pub interactive: bool,
}

impl Default for PopupOptions {
    fn default() -> Self {
        Self {
            offset: [0, -10],
            max_width: 250,
            class_name: String::from("destination-popup"),
            close_button: false,
            auto_close: false,
            close_on_escape_key: false,
            close_on_click: false,
            interactive: false,
        }
    }
}

impl PopupOptions {
    /// True when no user gesture can dismiss the popup.
    pub fn is_persistent(&self) -> bool {
        !(self.close_button || self.auto_close || self.close_on_escape_key || self.close_on_click)
    }
}
