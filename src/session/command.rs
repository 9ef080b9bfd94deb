use std::fmt;

/// What the viewer is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Image,
    Video,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Image => write!(f, "image"),
            Mode::Video => write!(f, "video"),
        }
    }
}

/// User commands bound to single keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Esc / q
    Quit,
    /// v
    ShowVideo,
    /// i
    ShowImage,
    /// s: snapshot in image mode, export in video mode
    Save,
    /// p
    Snapshot,
    /// e
    ExportVideo,
}

impl Command {
    /// Map a typed character to its command. Escape is handled by the viewer.
    pub fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'q' => Some(Command::Quit),
            'v' => Some(Command::ShowVideo),
            'i' => Some(Command::ShowImage),
            's' => Some(Command::Save),
            'p' => Some(Command::Snapshot),
            'e' => Some(Command::ExportVideo),
            _ => None,
        }
    }

    pub fn key_hint(&self) -> &'static str {
        match self {
            Command::Quit => "Esc/q",
            Command::ShowVideo => "v",
            Command::ShowImage => "i",
            Command::Save => "s",
            Command::Snapshot => "p",
            Command::ExportVideo => "e",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Command::Quit => "quit",
            Command::ShowVideo => "show video",
            Command::ShowImage => "show image",
            Command::Save => "save (snapshot or export)",
            Command::Snapshot => "snapshot",
            Command::ExportVideo => "export video",
        }
    }

    pub const ALL: [Command; 6] = [
        Command::ShowImage,
        Command::ShowVideo,
        Command::Save,
        Command::Snapshot,
        Command::ExportVideo,
        Command::Quit,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(Command::from_key('q'), Some(Command::Quit));
        assert_eq!(Command::from_key('v'), Some(Command::ShowVideo));
        assert_eq!(Command::from_key('i'), Some(Command::ShowImage));
        assert_eq!(Command::from_key('s'), Some(Command::Save));
        assert_eq!(Command::from_key('p'), Some(Command::Snapshot));
        assert_eq!(Command::from_key('E'), Some(Command::ExportVideo));
        assert_eq!(Command::from_key('x'), None);
    }

    #[test]
    fn test_initial_mode_is_image() {
        assert_eq!(Mode::default(), Mode::Image);
        assert_eq!(Mode::Video.to_string(), "video");
    }
}
