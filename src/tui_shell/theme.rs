use ratatui::style::{Color, Modifier, Style};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(super) enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub(super) fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub(super) fn label(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub(super) fn base(self) -> Style {
        match self {
            Theme::Light => Style::default().fg(Color::Black).bg(Color::White),
            Theme::Dark => Style::default().fg(Color::White).bg(Color::Black),
        }
    }

    pub(super) fn text(self) -> Style {
        match self {
            Theme::Light => Style::default().fg(Color::Black),
            Theme::Dark => Style::default().fg(Color::White),
        }
    }

    pub(super) fn muted(self) -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub(super) fn accent(self) -> Style {
        match self {
            Theme::Light => Style::default().fg(Color::Blue),
            Theme::Dark => Style::default().fg(Color::Cyan),
        }
    }

    pub(super) fn bar(self) -> Style {
        Style::default().fg(Color::Yellow)
    }

    /// Highlight for categories tying the global maximum.
    pub(super) fn top(self) -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    pub(super) fn error(self) -> Style {
        Style::default().fg(Color::Red)
    }

    pub(super) fn info(self) -> Style {
        Style::default().fg(Color::Green)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_between_light_and_dark() {
        assert_eq!(Theme::default(), Theme::Light);
        assert_eq!(Theme::Light.toggle(), Theme::Dark);
        assert_eq!(Theme::Dark.toggle(), Theme::Light);
        assert_eq!(Theme::Dark.label(), "dark");
    }
}
