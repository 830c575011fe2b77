use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Intent {
    TogglePlay,
    FastForward,
    Rewind,
    ToggleInner,
    ToggleHelp,
    Quit,
}

pub(crate) fn collect_input_nonblocking(max_frame_time: Duration) -> anyhow::Result<Vec<Event>> {
    let mut out = Vec::new();

    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        let ev = event::read()?;
        let keep = match &ev {
            Event::Key(k) => matches!(k.kind, KeyEventKind::Press | KeyEventKind::Repeat),
            Event::Mouse(m) => matches!(m.kind, MouseEventKind::Down(_)),
            _ => false,
        };
        if keep {
            out.push(ev);
            if out.len() >= 32 {
                break;
            }
        }
    }
    Ok(out)
}

pub(crate) fn map_event_to_intent(ev: &Event) -> Option<Intent> {
    match ev {
        Event::Key(k) => map_key(k),
        // Clicking anywhere on the scene flips the view, like clicking the planets.
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            ..
        }) => Some(Intent::ToggleInner),
        _ => None,
    }
}

fn map_key(k: &KeyEvent) -> Option<Intent> {
    if k.modifiers.contains(KeyModifiers::CONTROL) {
        return match k.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(Intent::Quit),
            _ => None,
        };
    }
    match k.code {
        KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Char('P') => Some(Intent::TogglePlay),
        KeyCode::Right | KeyCode::Char('f') | KeyCode::Char('F') | KeyCode::Char(']') => {
            Some(Intent::FastForward)
        }
        KeyCode::Left | KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Char('[') => {
            Some(Intent::Rewind)
        }
        KeyCode::Tab | KeyCode::Char('i') | KeyCode::Char('I') => Some(Intent::ToggleInner),
        KeyCode::Char('h') | KeyCode::Char('H') => Some(Intent::ToggleHelp),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Intent::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn click(button: MouseButton) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(button),
            column: 10,
            row: 4,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn playback_keys() {
        assert_eq!(map_event_to_intent(&key(KeyCode::Char(' '))), Some(Intent::TogglePlay));
        assert_eq!(map_event_to_intent(&key(KeyCode::Right)), Some(Intent::FastForward));
        assert_eq!(map_event_to_intent(&key(KeyCode::Char(']'))), Some(Intent::FastForward));
        assert_eq!(map_event_to_intent(&key(KeyCode::Left)), Some(Intent::Rewind));
        assert_eq!(map_event_to_intent(&key(KeyCode::Char('r'))), Some(Intent::Rewind));
    }

    #[test]
    fn view_and_quit_keys() {
        assert_eq!(map_event_to_intent(&key(KeyCode::Tab)), Some(Intent::ToggleInner));
        assert_eq!(map_event_to_intent(&key(KeyCode::Char('h'))), Some(Intent::ToggleHelp));
        assert_eq!(map_event_to_intent(&key(KeyCode::Esc)), Some(Intent::Quit));
        assert_eq!(
            map_event_to_intent(&Event::Key(KeyEvent::new(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL
            ))),
            Some(Intent::Quit)
        );
        assert_eq!(map_event_to_intent(&key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn left_click_toggles_inner_view() {
        assert_eq!(map_event_to_intent(&click(MouseButton::Left)), Some(Intent::ToggleInner));
        assert_eq!(map_event_to_intent(&click(MouseButton::Right)), None);
    }
}
