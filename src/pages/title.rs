use std::collections::HashMap;

use color_eyre::eyre::Result;
use derive_builder::Builder;
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc::UnboundedSender;

use super::{Page, PageId};
use crate::{
    action::{act, Action, Command, TitleAction},
    config::PageKeyBindings,
    constants::TITLE_TEXT,
};

#[derive(Copy, Clone, PartialEq, Eq)]
enum OptionItem {
    Start,
    Debug,
    Exit,
}

#[derive(Builder)]
pub struct TitlePage {
    #[builder(default)]
    pub action_tx: Option<UnboundedSender<Action>>,
    #[builder(default)]
    pub keymap: PageKeyBindings,
    options: Vec<(OptionItem, &'static str)>,
    selected_option_index: usize,
}

impl TitlePage {
    pub fn new() -> Self {
        TitlePageBuilder::default()
            .options(vec![
                (OptionItem::Start, "Start playing"),
                (OptionItem::Debug, "Tune the game"),
                (OptionItem::Exit, "Exit"),
            ])
            .selected_option_index(0)
            .build()
            .unwrap()
    }

    fn up(&mut self) {
        if self.selected_option_index > 0 {
            self.selected_option_index -= 1;
        }
    }

    fn down(&mut self) {
        if self.selected_option_index < self.options.len() - 1 {
            self.selected_option_index += 1;
        }
    }

    fn select(&mut self) -> Option<Action> {
        let (item, _) = self.options[self.selected_option_index];
        match item {
            OptionItem::Start => Some(act!(Command::StartGame)),
            OptionItem::Debug => Some(act!(Command::OpenDebug)),
            OptionItem::Exit => Some(act!(Command::Quit)),
        }
    }
}

impl Page for TitlePage {
    fn id(&self) -> PageId {
        PageId::Title
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
        if let Command::Title(command) = action.command {
            match command {
                TitleAction::Up => self.up(),
                TitleAction::Down => self.down(),
                TitleAction::Select => return Ok(self.select()),
                TitleAction::Debug => return Ok(Some(act!(Command::OpenDebug))),
            }
        }
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, rect: Rect) -> Result<()> {
        f.render_widget(Clear, rect);

        let title_lines: Vec<&str> = TITLE_TEXT.lines().filter(|s| !s.is_empty()).collect();
        let num_title_lines = title_lines.len() as u16;

        let num_options = self.options.len() as u16;
        let option_height = num_options * 2 - 1;

        let [title_area, option_area] =
            Layout::vertical(vec![Constraint::Length(num_title_lines), Constraint::Length(option_height)])
                .flex(layout::Flex::SpaceAround)
                .areas(rect);

        let lines = title_lines.iter().map(|line| Line::from(*line)).collect::<Vec<_>>();
        let paragraph = Paragraph::new(lines).style(Style::default().fg(Color::Yellow)).alignment(Alignment::Center);
        f.render_widget(paragraph, title_area);

        let option_titles = self.options.iter().map(|(_, title)| *title).collect::<Vec<_>>();
        let max_option_len = option_titles.iter().map(|title| title.len()).max().unwrap_or(0) as u16;

        // Pad so the highlight bar covers every option evenly
        let option_titles = option_titles
            .into_iter()
            .map(|title| {
                let pad_len = max_option_len as usize - title.len();
                format!("  {}{}  ", title, " ".repeat(pad_len))
            })
            .collect::<Vec<_>>();

        let [option_area] = Layout::horizontal(vec![Constraint::Length(max_option_len + (2 * 2))])
            .flex(layout::Flex::SpaceAround)
            .areas(option_area);

        let mut lines = vec![];
        for (index, title) in option_titles.iter().enumerate() {
            lines.push(Line::from(title.as_str()).style({
                if index == self.selected_option_index {
                    Style::default().bg(Color::Cyan)
                } else {
                    Style::default()
                }
            }));
            if index < option_titles.len() - 1 {
                lines.push(Line::from(""));
            }
        }

        let paragraph = Paragraph::new(lines).style(Style::default().fg(Color::White)).alignment(Alignment::Left);
        f.render_widget(paragraph, option_area);

        Ok(())
    }
}
