use std::collections::HashMap;

use color_eyre::eyre::Result;
use derive_builder::Builder;
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc::UnboundedSender;

use super::{Page, PageId};
use crate::{
    action::{act, Action, Command, OverAction},
    config::PageKeyBindings,
    constants::GAME_OVER_TEXT,
};

#[derive(Builder)]
pub struct OverPage {
    #[builder(default)]
    pub action_tx: Option<UnboundedSender<Action>>,
    #[builder(default)]
    pub keymap: PageKeyBindings,
    #[builder(default)]
    score: u32,
    #[builder(default)]
    best: u32,
    #[builder(default)]
    new_best: bool,
}

impl OverPage {
    pub fn new() -> Self {
        OverPageBuilder::default().build().unwrap()
    }
}

impl Page for OverPage {
    fn id(&self) -> PageId {
        PageId::Over
    }

    fn register_keymap(&mut self, keymaps: &HashMap<PageId, PageKeyBindings>) -> Result<()> {
        if let Some(keymap) = keymaps.get(&self.id()) {
            self.keymap = keymap.clone();
        }
        Ok(())
    }

    fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(tx);
        Ok(())
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action.command {
            Command::ShowGameOver { score, best, new_best } => {
                self.score = score;
                self.best = best;
                self.new_best = new_best;
            },
            Command::Over(OverAction::Confirm) => return Ok(Some(act!(Command::BackToTitle))),
            _ => {},
        }
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, rect: Rect) -> Result<()> {
        f.render_widget(Clear, rect);

        let banner_lines: Vec<&str> = GAME_OVER_TEXT.lines().filter(|s| !s.is_empty()).collect();
        let num_banner_lines = banner_lines.len() as u16;

        let [banner_area, score_area] =
            Layout::vertical(vec![Constraint::Length(num_banner_lines), Constraint::Length(4)])
                .flex(layout::Flex::SpaceAround)
                .areas(rect);

        let lines = banner_lines.iter().map(|line| Line::from(*line)).collect::<Vec<_>>();
        let banner = Paragraph::new(lines).style(Style::default().fg(Color::Red)).alignment(Alignment::Center);
        f.render_widget(banner, banner_area);

        let mut lines = vec![Line::from(format!("Score: {}    Best: {}", self.score, self.best))];
        if self.new_best {
            lines.push(Line::from("New best!").style(Style::default().fg(Color::Yellow)));
        } else {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(""));
        lines.push(Line::from("Press Enter to continue").style(Style::default().fg(Color::DarkGray)));

        let scores = Paragraph::new(lines).style(Style::default().fg(Color::White)).alignment(Alignment::Center);
        f.render_widget(scores, score_area);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_stores_results() {
        let mut page = OverPage::new();
        page.update(act!(Command::ShowGameOver { score: 7, best: 12, new_best: false })).unwrap();
        assert_eq!(page.score, 7);
        assert_eq!(page.best, 12);
        assert!(!page.new_best);
    }

    #[test]
    fn test_confirm_returns_to_title() {
        let mut page = OverPage::new();
        let action = page.update(act!(Command::Over(OverAction::Confirm))).unwrap();
        assert_eq!(action.unwrap().command, Command::BackToTitle);
    }
}
