use crate::host::InboundMessage;
use crossterm::event::Event;

pub enum AppEvent {
    Input(Event),
    Embed(InboundMessage),
    Tick,
}
