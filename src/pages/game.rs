use std::{collections::HashMap, time::Instant};

use color_eyre::eyre::Result;
use derive_builder::Builder;
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc::UnboundedSender;

use super::{Page, PageId};
use crate::{
    action::{act, Action, Command, GameAction},
    components::sprite_view::SpriteView,
    config::PageKeyBindings,
    constants::{game, HEIGHT, WIDTH},
    sim::{GameSession, SessionState, TickInput, Tunables},
};

// The playfield is the bordered canvas minus the border itself.
const CANVAS_WIDTH: u16 = WIDTH - 2;
const CANVAS_HEIGHT: u16 = HEIGHT - 2;

// A suspend or terminal stall would otherwise integrate one huge step.
const MAX_DT: f32 = 0.25;

#[derive(Builder)]
pub struct GamePage {
    #[builder(default)]
    pub action_tx: Option<UnboundedSender<Action>>,
    #[builder(default)]
    pub keymap: PageKeyBindings,
    #[builder(default)]
    session: GameSession,
    tunables: Tunables,
    #[builder(default)]
    last_tick: Option<Instant>,
    #[builder(default)]
    jump_queued: bool,
    #[builder(default)]
    show_hitboxes: bool,
}

impl GamePage {
    pub fn new() -> Self {
        GamePageBuilder::default().tunables(Tunables::default()).build().unwrap()
    }

    fn start_run(&mut self) {
        self.session.back_to_title();
        self.session.start(self.tunables, CANVAS_WIDTH, CANVAS_HEIGHT);
        self.last_tick = Some(Instant::now());
        self.jump_queued = false;
    }

    fn tick(&mut self) -> Option<Action> {
        if self.session.state() != SessionState::Playing {
            return None;
        }

        let now = Instant::now();
        let dt = match self.last_tick {
            Some(last) => (now - last).as_secs_f32().min(MAX_DT),
            None => 0.0,
        };
        self.last_tick = Some(now);

        let input = TickInput { jump: std::mem::take(&mut self.jump_queued) };
        let report = self.session.tick(dt, &input, &mut rand::thread_rng());

        if report.collided {
            return Some(act!(Command::SessionEnded { score: self.session.score() }));
        }
        None
    }
}

impl Page for GamePage {
    fn id(&self) -> PageId {
        PageId::Game
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
            Command::Tick => return Ok(self.tick()),
            Command::StartGame => self.start_run(),
            Command::SetTunables(tunables) => self.tunables = tunables.sanitized(),
            Command::Resume => self.last_tick = Some(Instant::now()),
            Command::Game(command) => match command {
                GameAction::Jump => self.jump_queued = true,
                GameAction::ToggleHitboxes => self.show_hitboxes = !self.show_hitboxes,
            },
            _ => {},
        }
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, rect: Rect) -> Result<()> {
        f.render_widget(Clear, rect);

        let flyer = self.session.flyer();
        let flyer_origin = flyer.cell_origin();

        for obstacle in self.session.obstacles().iter() {
            let (col, row) = obstacle.cell_origin();
            f.render_widget(
                SpriteView::new(obstacle.sprite().rows().to_vec())
                    .offset(col, row)
                    .style(Style::default().fg(game::PIPE_COLOR)),
                rect,
            );
        }

        f.render_widget(
            SpriteView::new(flyer.sprite().rows().to_vec())
                .offset(flyer_origin.0, flyer_origin.1)
                .style(Style::default().fg(game::FLYER_COLOR)),
            rect,
        );

        if self.show_hitboxes {
            let hitbox_style = Style::default().fg(game::HITBOX_COLOR);
            for obstacle in self.session.obstacles().iter() {
                let (col, row) = obstacle.cell_origin();
                f.render_widget(
                    SpriteView::new(obstacle.sprite().mask_rows()).offset(col, row).style(hitbox_style),
                    rect,
                );
            }
            f.render_widget(
                SpriteView::new(flyer.sprite().mask_rows())
                    .offset(flyer_origin.0, flyer_origin.1)
                    .style(hitbox_style),
                rect,
            );
        }

        let score = Paragraph::new(format!(" Score: {} ", self.session.score()))
            .style(Style::default().fg(Color::White).bg(Color::Black));
        let score_area = Rect { x: rect.x + 1, y: rect.y, width: rect.width.saturating_sub(2), height: 1 };
        f.render_widget(score, score_area);

        Ok(())
    }
}
