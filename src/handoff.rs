//! Clipboard copy and messaging-link hand-off for a finished summary.

use copypasta::{ClipboardContext, ClipboardProvider};
use std::process::Command;
use tracing::{info, warn};

use crate::error::OrderError;

pub const COPIED: &str = "Order details copied!";
pub const COPIED_FOR_MESSAGING: &str = "Order details copied. Paste them into LINE and send.";
pub const COPY_FAILED: &str = "Copy failed. Please send a screenshot instead.";
pub const COPY_FAILED_FOR_MESSAGING: &str = "Copy failed. Please send a screenshot via LINE instead.";

pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), OrderError>;
}

/// Whether copied text disappears when the copying process exits.
///
/// On X11/Wayland the selection is served by its owner, so a CLI has to stay
/// alive (holding its `SystemClipboard`) until the user has pasted.
pub const fn clipboard_owned_by_process() -> bool {
    cfg!(all(unix, not(target_os = "macos")))
}

/// The desktop clipboard. The context is kept for the lifetime of this
/// value, so it must outlive the paste on platforms where
/// [`clipboard_owned_by_process`] is true.
#[derive(Default)]
pub struct SystemClipboard {
    ctx: Option<ClipboardContext>,
}

impl SystemClipboard {
    pub fn holds_contents(&self) -> bool {
        self.ctx.is_some()
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), OrderError> {
        let ctx = match self.ctx.take() {
            Some(ctx) => ctx,
            None => ClipboardContext::new().map_err(|e| OrderError::Clipboard(e.to_string()))?,
        };
        let ctx = self.ctx.insert(ctx);
        ctx.set_contents(text.to_owned())
            .map_err(|e| OrderError::Clipboard(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandOff {
    pub copied: bool,
    pub link_opened: bool,
    pub message: &'static str, // shown to the user either way
}

/// Copies `text`, then opens `link` (if any) with `open`.
///
/// The link is only opened after a successful copy. A failed copy is not an
/// error: the returned message tells the user to fall back to a screenshot.
pub fn hand_off<F>(
    clipboard: &mut dyn Clipboard,
    text: &str,
    link: Option<&str>,
    open: F,
) -> HandOff
where
    F: FnOnce(&str) -> Result<(), OrderError>,
{
    if let Err(e) = clipboard.set_text(text) {
        warn!(error = %e, "copying the summary failed");
        return HandOff {
            copied: false,
            link_opened: false,
            message: if link.is_some() {
                COPY_FAILED_FOR_MESSAGING
            } else {
                COPY_FAILED
            },
        };
    }
    info!(bytes = text.len(), "summary copied to clipboard");

    let Some(url) = link else {
        return HandOff {
            copied: true,
            link_opened: false,
            message: COPIED,
        };
    };

    let link_opened = match open(url) {
        Ok(()) => {
            info!(url, "opened messaging link");
            true
        }
        Err(e) => {
            warn!(error = %e, "opening the messaging link failed");
            false
        }
    };
    HandOff {
        copied: true,
        link_opened,
        message: COPIED_FOR_MESSAGING,
    }
}

/// Opens a URL with the platform's default handler.
pub fn open_link(url: &str) -> Result<(), OrderError> {
    #[cfg(target_os = "macos")]
    let mut cmd = Command::new("open");
    #[cfg(target_os = "windows")]
    let mut cmd = Command::new("explorer");
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let mut cmd = Command::new("xdg-open");

    cmd.arg(url).spawn().map(drop).map_err(|source| OrderError::OpenLink {
        url: url.to_string(),
        source,
    })
}
