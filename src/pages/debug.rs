use std::collections::HashMap;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use derive_builder::Builder;
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc::UnboundedSender;
use tui_input::{backend::crossterm::EventHandler, Input};

use super::{Page, PageId};
use crate::{
    action::{act, Action, Command, DebugAction},
    config::{Config, PageKeyBindings},
    sim::Tunables,
};

#[derive(Copy, Clone, PartialEq, Eq)]
enum Field {
    Gravity,
    JumpImpulse,
    FlyerSize,
    PipeSpeed,
    PipeGap,
    SpawnSpacing,
    GrowthPercent,
}

impl Field {
    const ALL: [Field; 7] = [
        Field::Gravity,
        Field::JumpImpulse,
        Field::FlyerSize,
        Field::PipeSpeed,
        Field::PipeGap,
        Field::SpawnSpacing,
        Field::GrowthPercent,
    ];

    fn label(self) -> &'static str {
        match self {
            Field::Gravity => "Gravity (cells/s²)",
            Field::JumpImpulse => "Jump impulse (cells/s)",
            Field::FlyerSize => "Flyer size (rows)",
            Field::PipeSpeed => "Pipe speed (cells/s)",
            Field::PipeGap => "Pipe gap (rows)",
            Field::SpawnSpacing => "Spawn spacing (cells)",
            Field::GrowthPercent => "Growth per pair (%)",
        }
    }

    fn get(self, tunables: &Tunables) -> f32 {
        match self {
            Field::Gravity => tunables.gravity,
            Field::JumpImpulse => tunables.jump_impulse,
            Field::FlyerSize => tunables.flyer_size,
            Field::PipeSpeed => tunables.pipe_speed,
            Field::PipeGap => tunables.pipe_gap,
            Field::SpawnSpacing => tunables.spawn_spacing,
            Field::GrowthPercent => tunables.growth_percent,
        }
    }

    fn set(self, tunables: &mut Tunables, value: f32) {
        match self {
            Field::Gravity => tunables.gravity = value,
            Field::JumpImpulse => tunables.jump_impulse = value,
            Field::FlyerSize => tunables.flyer_size = value,
            Field::PipeSpeed => tunables.pipe_speed = value,
            Field::PipeGap => tunables.pipe_gap = value,
            Field::SpawnSpacing => tunables.spawn_spacing = value,
            Field::GrowthPercent => tunables.growth_percent = value,
        }
    }

    fn accepts(self, value: f32) -> bool {
        if !value.is_finite() {
            return false;
        }
        match self {
            Field::JumpImpulse => value < 0.0,
            Field::GrowthPercent => value >= 0.0,
            _ => value > 0.0,
        }
    }
}

#[derive(Builder)]
pub struct DebugPage {
    #[builder(default)]
    pub action_tx: Option<UnboundedSender<Action>>,
    #[builder(default)]
    pub keymap: PageKeyBindings,
    tunables: Tunables,
    inputs: Vec<Input>,
    focus: usize,
}

impl DebugPage {
    pub fn new() -> Self {
        let tunables = Tunables::default();
        DebugPageBuilder::default()
            .tunables(tunables)
            .inputs(Self::inputs_for(&tunables))
            .focus(0)
            .build()
            .unwrap()
    }

    fn inputs_for(tunables: &Tunables) -> Vec<Input> {
        Field::ALL.iter().map(|field| Input::new(format!("{}", field.get(tunables)))).collect()
    }

    fn refresh_inputs(&mut self) {
        self.inputs = Self::inputs_for(&self.tunables);
        self.focus = 0;
    }

    fn next(&mut self) {
        self.focus = (self.focus + 1) % self.inputs.len();
    }

    fn prev(&mut self) {
        self.focus = (self.focus + self.inputs.len() - 1) % self.inputs.len();
    }

    /// Folds the edited fields back into the tunables. A field that does not
    /// parse, or parses to a value the simulation cannot run with, keeps its
    /// previous value.
    fn commit(&mut self) -> Tunables {
        for (field, input) in Field::ALL.iter().zip(self.inputs.iter()) {
            match input.value().trim().parse::<f32>() {
                Ok(value) if field.accepts(value) => field.set(&mut self.tunables, value),
                _ => {
                    log::warn!("keeping previous value for {}: {:?}", field.label(), input.value());
                },
            }
        }
        self.tunables
    }
}

impl Page for DebugPage {
    fn id(&self) -> PageId {
        PageId::Debug
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

    fn register_config_handler(&mut self, config: Config) -> Result<()> {
        self.tunables = config.game;
        self.refresh_inputs();
        Ok(())
    }

    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        // Navigation and close go through the keymap; everything else edits
        // the focused field.
        if matches!(key.code, KeyCode::Esc | KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down) {
            return Ok(None);
        }
        if let Some(input) = self.inputs.get_mut(self.focus) {
            input.handle_event(&crossterm::event::Event::Key(key));
        }
        Ok(None)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action.command {
            Command::OpenDebug => self.refresh_inputs(),
            Command::Debug(command) => match command {
                DebugAction::Next => self.next(),
                DebugAction::Prev => self.prev(),
                DebugAction::Close => {
                    let tunables = self.commit();
                    if let Some(tx) = &self.action_tx {
                        tx.send(act!(Command::SetTunables(tunables)))?;
                    }
                    return Ok(Some(act!(Command::CloseDebug)));
                },
            },
            _ => {},
        }
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, rect: Rect) -> Result<()> {
        f.render_widget(Clear, rect);

        let row_height = 3;
        let label_width = Field::ALL.iter().map(|field| field.label().len()).max().unwrap_or(0) as u16;
        let input_width = 12;

        let [area] = Layout::horizontal(vec![Constraint::Length(label_width + 3 + input_width)])
            .flex(layout::Flex::SpaceAround)
            .areas(rect);
        let [_, area] = Layout::vertical(vec![
            Constraint::Length(1),
            Constraint::Length(row_height * Field::ALL.len() as u16),
        ])
        .flex(layout::Flex::SpaceAround)
        .areas(area);

        for (index, (field, input)) in Field::ALL.iter().zip(self.inputs.iter()).enumerate() {
            let row = Rect { x: area.x, y: area.y + index as u16 * row_height, width: area.width, height: row_height };
            let [label_area, input_area] =
                Layout::horizontal(vec![Constraint::Length(label_width + 1), Constraint::Length(input_width + 2)])
                    .flex(layout::Flex::SpaceBetween)
                    .areas(row);

            let focused = index == self.focus;
            let label = Paragraph::new(field.label()).style(if focused {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            });
            f.render_widget(
                label,
                Rect { x: label_area.x, y: label_area.y + 1, width: label_area.width, height: 1 },
            );

            let border_style =
                if focused { Style::default().fg(Color::Cyan) } else { Style::default().fg(Color::DarkGray) };
            let widget = Paragraph::new(input.value())
                .block(Block::default().borders(Borders::ALL).border_style(border_style));
            f.render_widget(widget, input_area);

            if focused {
                f.set_cursor_position((input_area.x + 1 + input.visual_cursor() as u16, input_area.y + 1));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn page_with(values: &[&str]) -> DebugPage {
        let mut page = DebugPage::new();
        page.inputs = values.iter().map(|v| Input::new(v.to_string())).collect();
        page
    }

    #[test]
    fn test_commit_applies_parsed_values() {
        let mut page = page_with(&["50", "-20", "3", "15", "8", "40", "2.5"]);
        let tunables = page.commit();
        assert_eq!(tunables.gravity, 50.0);
        assert_eq!(tunables.jump_impulse, -20.0);
        assert_eq!(tunables.growth_percent, 2.5);
    }

    #[test]
    fn test_unparsable_field_keeps_previous_value() {
        let mut page = page_with(&["not a number", "-20", "3", "15", "8", "40", "2.5"]);
        let tunables = page.commit();
        assert_eq!(tunables.gravity, Tunables::default().gravity);
        assert_eq!(tunables.jump_impulse, -20.0);
    }

    #[test]
    fn test_wrong_sign_keeps_previous_value() {
        let mut page = page_with(&["50", "20", "3", "15", "8", "40", "2.5"]);
        let tunables = page.commit();
        assert_eq!(tunables.jump_impulse, Tunables::default().jump_impulse);
        assert_eq!(tunables.gravity, 50.0);
    }

    #[test]
    fn test_focus_wraps() {
        let mut page = DebugPage::new();
        page.prev();
        assert_eq!(page.focus, Field::ALL.len() - 1);
        page.next();
        assert_eq!(page.focus, 0);
    }
}
