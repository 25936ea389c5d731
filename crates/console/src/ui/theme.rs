use analysis_core::capture::CapacityTier;
use analysis_core::readiness::Readiness;
use analysis_core::risk::{RiskScale, RiskTone};
use ratatui::style::{Color, Modifier, Style};

use crate::preferences::ThemeMode;

#[derive(Clone, Copy)]
pub(crate) enum ValueStyle {
    Normal,
    Important,
    Dim,
}

pub(crate) struct Theme {
    background: Color,
    border: Color,
    title: Color,
    text: Color,
    dim: Color,
    accent: Color,
    highlight_fg: Color,
    highlight_bg: Color,
    warn: Color,
    ok: Color,
    error: Color,
}

impl Theme {
    pub(crate) fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }

    pub(crate) fn dark() -> Self {
        Self {
            background: Color::Reset,
            border: Color::DarkGray,
            title: Color::Blue,
            text: Color::White,
            dim: Color::Gray,
            accent: Color::Cyan,
            highlight_fg: Color::White,
            highlight_bg: Color::DarkGray,
            warn: Color::Yellow,
            ok: Color::Green,
            error: Color::Red,
        }
    }

    pub(crate) fn light() -> Self {
        Self {
            background: Color::Rgb(0xfa, 0xf7, 0xf0),
            border: Color::Gray,
            title: Color::Rgb(0x1a, 0x3c, 0x6e),
            text: Color::Black,
            dim: Color::DarkGray,
            accent: Color::Rgb(0x8b, 0x1e, 0x3f),
            highlight_fg: Color::Black,
            highlight_bg: Color::Rgb(0xe8, 0xe2, 0xd4),
            warn: Color::Rgb(0xb7, 0x95, 0x0b),
            ok: Color::Rgb(0x1e, 0x84, 0x49),
            error: Color::Rgb(0xc0, 0x39, 0x2b),
        }
    }

    pub(crate) fn base_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub(crate) fn block<'a>(&self, title: &'a str) -> ratatui::widgets::Block<'a> {
        ratatui::widgets::Block::default()
            .title(ratatui::text::Span::styled(
                title,
                Style::default()
                    .fg(self.title)
                    .add_modifier(Modifier::BOLD),
            ))
            .borders(ratatui::widgets::Borders::ALL)
            .border_style(Style::default().fg(self.border))
    }

    /// Block for the focused field.
    pub(crate) fn focused_block<'a>(
        &self,
        title: &'a str,
        focused: bool,
    ) -> ratatui::widgets::Block<'a> {
        let block = self.block(title);
        if focused {
            block.border_style(Style::default().fg(self.accent))
        } else {
            block
        }
    }

    pub(crate) fn highlight_style(&self) -> Style {
        Style::default()
            .fg(self.highlight_fg)
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub(crate) fn help_style(&self) -> Style {
        Style::default().fg(self.dim)
    }

    pub(crate) fn accent_style(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub(crate) fn warn_style(&self) -> Style {
        Style::default().fg(self.warn).add_modifier(Modifier::BOLD)
    }

    pub(crate) fn error_style(&self) -> Style {
        Style::default().fg(self.error).add_modifier(Modifier::BOLD)
    }

    pub(crate) fn key_style(&self) -> Style {
        Style::default().fg(self.dim)
    }

    pub(crate) fn value_style(&self, level: ValueStyle) -> Style {
        match level {
            ValueStyle::Normal => Style::default().fg(self.text),
            ValueStyle::Important => Style::default()
                .fg(self.accent)
                .add_modifier(Modifier::BOLD),
            ValueStyle::Dim => Style::default().fg(self.dim),
        }
    }

    pub(crate) fn readiness_style(&self, readiness: Readiness) -> Style {
        match readiness {
            Readiness::Unknown => Style::default().fg(self.dim),
            Readiness::Available => Style::default().fg(self.ok).add_modifier(Modifier::BOLD),
            Readiness::Unavailable => Style::default()
                .fg(self.error)
                .add_modifier(Modifier::BOLD),
        }
    }

    pub(crate) fn capacity_style(&self, tier: CapacityTier) -> Style {
        match tier {
            CapacityTier::Nominal => Style::default().fg(self.ok),
            CapacityTier::Warning => Style::default().fg(self.warn),
            CapacityTier::Critical => Style::default().fg(self.error),
        }
    }

    /// Risk colors come from the skin's palette, not the theme.
    pub(crate) fn tone_style(&self, tone: RiskTone, scale: RiskScale) -> Style {
        let color = tone.hex(scale).parse::<Color>().unwrap_or(self.accent);
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }
}
