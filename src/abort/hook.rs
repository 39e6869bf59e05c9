use rdev::{EventType, Key, listen};
use std::thread;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{trace, warn};

use crate::config::AbortKey;

pub(crate) fn rdev_key(key: AbortKey) -> Key {
    match key {
        AbortKey::Escape => Key::Escape,
        AbortKey::F12 => Key::F12,
        AbortKey::Pause => Key::Pause,
        AbortKey::ScrollLock => Key::ScrollLock,
    }
}

/// Install a global keyboard hook on its own thread and forward presses of
/// `key` into `presses`.
///
/// The OS hook cannot be removed once installed; after the receiving side is
/// closed the callback simply discards events.
pub(crate) fn spawn_key_hook(key: AbortKey, presses: UnboundedSender<()>) {
    let target = rdev_key(key);
    let spawned = thread::Builder::new()
        .name("ghostwriter-abort-hook".into())
        .spawn(move || {
            let result = listen(move |event| {
                if let EventType::KeyPress(pressed) = event.event_type {
                    if pressed == target && !presses.is_closed() {
                        trace!(target: "ghostwriter::abort", ?pressed, "Abort key seen");
                        let _ = presses.send(());
                    }
                }
            });
            if let Err(err) = result {
                warn!(target: "ghostwriter::abort", error = ?err, "Global key hook unavailable");
            }
        });
    if let Err(err) = spawned {
        warn!(target: "ghostwriter::abort", error = %err, "Failed to start key hook thread");
    }
}
