//! Echo bot standing in for a real transport

use std::time::Duration;

use chatdock::widget::Message;
use tokio::sync::mpsc::UnboundedSender;

use super::host::HostEvent;
use super::quick_replies;

/// How long the bot "types" before answering
pub const REPLY_DELAY: Duration = Duration::from_millis(1200);

const LONG_REPLY_OPTION: &str = "Send a long message";

const LONG_REPLY: &str = "This is a longer answer so there is something worth \
reading fullscreen. Press Ctrl+F while the panel is open to show the latest \
message on its own, and Esc to return to the conversation. Messages that \
arrive while the panel is closed are counted on the toggle badge, previewed \
in the teaser and blinked into the terminal title.";

/// Answer to a message the user sent
pub fn compose_reply(text: Option<&str>) -> Message {
    match text.map(str::trim) {
        Some(text) if text.eq_ignore_ascii_case("help") => quick_replies::message(
            "What would you like to try?",
            &[LONG_REPLY_OPTION, "Say hello", "Nothing, thanks"],
        ),
        Some(LONG_REPLY_OPTION) => Message::bot(LONG_REPLY),
        Some("Say hello") => Message::bot("Hello! 👋"),
        Some(text) if !text.is_empty() => Message::bot(format!("You said: {text}")),
        _ => Message::bot("Got it."),
    }
}

pub fn welcome() -> Message {
    Message::bot("Welcome to chatdock. Type \"help\" for a few options.")
}

/// Reply after [`REPLY_DELAY`], showing the typing indicator meanwhile
pub fn reply(tx: &UnboundedSender<HostEvent>, text: Option<&str>) {
    let reply = compose_reply(text);
    deliver(tx, reply, REPLY_DELAY);
}

/// Send `message` from the bot after `delay`
pub fn deliver(tx: &UnboundedSender<HostEvent>, message: Message, delay: Duration) {
    let _ = tx.send(HostEvent::BotTyping(true));
    let tx = tx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        if tx.send(HostEvent::BotReply(message)).is_err() {
            tracing::debug!("Host loop gone, dropping bot reply");
        }
    });
}

/// Report the connection as established after `delay`
pub fn connect(tx: &UnboundedSender<HostEvent>, delay: Duration) {
    let tx = tx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = tx.send(HostEvent::Connected);
    });
}
