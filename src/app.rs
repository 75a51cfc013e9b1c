use color_eyre::eyre::Result;
use ratatui::{
    layout::{Constraint, Layout, Margin},
    prelude::Rect,
    style::{Color, Style},
    widgets::{Block, BorderType, Borders},
    Frame,
};
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::{
    action::{act, Action, Command},
    components::{fps::FpsCounter, help::Help},
    config::Config,
    constants::{HEIGHT, WIDTH},
    highscores::HighScores,
    pages::{debug::DebugPage, game::GamePage, over::OverPage, title::TitlePage, Page},
    sim::Tunables,
    tui,
};

const TITLE_PAGE: usize = 0;
const GAME_PAGE: usize = 1;
const DEBUG_PAGE: usize = 2;
const OVER_PAGE: usize = 3;

pub struct App {
    config: Config,
    tick_rate: f64,
    frame_rate: f64,
    should_quit: bool,
    should_suspend: bool,
    show_help: bool,
    show_fps: bool,
    fps_counter: FpsCounter,
    highscores: HighScores,
    tunables: Tunables,
    pages: Vec<Box<dyn Page>>,
    active_page_index: usize,
}

impl App {
    pub fn new(tick_rate: f64, frame_rate: f64) -> Result<Self> {
        let config = Config::new()?;
        let tunables = config.game;

        let title_page = TitlePage::new();
        let game_page = GamePage::new();
        let debug_page = DebugPage::new();
        let over_page = OverPage::new();

        Ok(Self {
            tick_rate,
            frame_rate,
            should_quit: false,
            should_suspend: false,
            show_help: false,
            show_fps: false,
            fps_counter: FpsCounter::new(),
            highscores: HighScores::load(),
            tunables,
            config,
            pages: vec![Box::new(title_page), Box::new(game_page), Box::new(debug_page), Box::new(over_page)],
            active_page_index: TITLE_PAGE,
        })
    }

    fn get_active_page(&mut self) -> &mut Box<dyn Page> {
        self.pages.get_mut(self.active_page_index).unwrap()
    }

    fn set_active_page(&mut self, index: usize) {
        if index < self.pages.len() {
            self.active_page_index = index;
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();

        let mut tui = tui::Tui::new()?;
        tui.tick_rate(self.tick_rate);
        tui.frame_rate(self.frame_rate);
        tui.enter()?;

        for page in self.pages.iter_mut() {
            page.register_keymap(&self.config.keybindings.pages)?;
        }

        for page in self.pages.iter_mut() {
            page.register_action_handler(action_tx.clone())?;
        }

        for page in self.pages.iter_mut() {
            page.register_config_handler(self.config.clone())?;
        }

        for page in self.pages.iter_mut() {
            page.init()?;
        }

        loop {
            if let Some(e) = tui.next().await {
                match e {
                    tui::Event::Quit => action_tx.send(act!(Command::Quit))?,
                    tui::Event::Tick => action_tx.send(act!(Command::Tick))?,
                    tui::Event::Render => action_tx.send(act!(Command::Render))?,
                    tui::Event::Resize(x, y) => action_tx.send(act!(Command::Resize(x, y)))?,
                    tui::Event::Key(key) => {
                        let mut action = None;

                        let active_page_id = self.get_active_page().id();
                        if let Some(keymap) = self.config.keybindings.pages.get(&active_page_id) {
                            action = keymap.0.get(&key);
                        };
                        if let Some(act) = self.config.keybindings.global.0.get(&key) {
                            action = Some(act)
                        }

                        if let Some(action) = action {
                            log::info!("Got action: {action:?}");
                            action_tx.send(action.clone())?;
                        }
                    },
                    _ => {},
                }
                if let Some(action) = self.get_active_page().handle_events(Some(e))? {
                    action_tx.send(action)?;
                }
            }

            while let Ok(action) = action_rx.try_recv() {
                let Action { command, state: _ } = &action;
                if *command != Command::Tick && *command != Command::Render {
                    log::debug!("{command:?}");
                }
                match command {
                    Command::Tick => self.fps_counter.on_tick(),
                    Command::Quit => self.should_quit = true,
                    Command::Suspend => self.should_suspend = true,
                    Command::Resume => self.should_suspend = false,
                    Command::ToggleShowHelp => self.show_help = !self.show_help,
                    Command::ToggleFps => self.show_fps = !self.show_fps,
                    Command::Error(msg) => log::error!("{msg}"),
                    Command::Resize(w, h) => {
                        tui.resize(Rect::new(0, 0, *w, *h))?;
                        self.render(&mut tui, &action_tx)?;
                    },
                    Command::Render => {
                        self.fps_counter.on_frame();
                        self.render(&mut tui, &action_tx)?;
                    },
                    Command::StartGame => {
                        self.set_active_page(GAME_PAGE);
                        // The game page must know the current tunables before
                        // the start command reaches it below.
                        let tunables = self.tunables;
                        if let Some(action) = self.get_active_page().update(act!(Command::SetTunables(tunables)))? {
                            action_tx.send(action)?;
                        }
                    },
                    Command::OpenDebug => {
                        if self.active_page_index == TITLE_PAGE {
                            self.set_active_page(DEBUG_PAGE);
                        }
                    },
                    Command::CloseDebug => {
                        self.set_active_page(TITLE_PAGE);
                    },
                    Command::BackToTitle => {
                        self.set_active_page(TITLE_PAGE);
                    },
                    Command::SetTunables(tunables) => {
                        self.tunables = tunables.sanitized();
                    },
                    Command::SessionEnded { score } => {
                        let new_best = self.highscores.submit(*score);
                        if let Err(e) = self.highscores.save() {
                            log::error!("Failed to save high scores: {e}");
                        }
                        action_tx.send(act!(Command::ShowGameOver {
                            score: *score,
                            best: self.highscores.best,
                            new_best,
                        }))?;
                        self.set_active_page(OVER_PAGE);
                    },
                    _ => {},
                }
                if !self.show_help {
                    if let Some(action) = self.get_active_page().update(action)? {
                        action_tx.send(action)?
                    }
                }
            }
            if self.should_suspend {
                tui.suspend()?;
                action_tx.send(act!(Command::Resume))?;
                tui = tui::Tui::new()?;
                tui.tick_rate(self.tick_rate);
                tui.frame_rate(self.frame_rate);
                tui.enter()?;
            } else if self.should_quit {
                tui.stop()?;
                break;
            }
        }
        tui.exit()?;
        Ok(())
    }

    fn render(&mut self, tui: &mut tui::Tui, action_tx: &UnboundedSender<Action>) -> Result<()> {
        tui.draw(|f| {
            let area = f.area();

            let [_, area, _] =
                Layout::vertical([Constraint::Fill(1), Constraint::Length(HEIGHT), Constraint::Fill(1)]).areas(area);
            let [_, area, _] =
                Layout::horizontal([Constraint::Fill(1), Constraint::Length(WIDTH), Constraint::Fill(1)]).areas(area);

            let border = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().bg(Color::Black));
            f.render_widget(border, area);

            let inner = area.inner(Margin { horizontal: 1, vertical: 1 });

            if let Some(page) = self.pages.get_mut(self.active_page_index) {
                let r = page.draw(f, inner);
                if let Err(e) = r {
                    action_tx.send(act!(Command::Error(format!("Failed to draw: {:?}", e)))).unwrap();
                }
            }

            if self.show_fps {
                let fps_area = Rect { x: inner.x, y: area.y, width: inner.width, height: 1 };
                f.render_widget(&self.fps_counter, fps_area);
            }

            if self.show_help {
                let r = self.draw_help(f, inner);
                if let Err(e) = r {
                    action_tx.send(act!(Command::Error(format!("Failed to draw: {:?}", e)))).unwrap();
                }
            };
        })?;

        Ok(())
    }

    fn draw_help(&mut self, f: &mut Frame<'_>, rect: Rect) -> Result<()> {
        let active_page_id = self.get_active_page().id();
        let mut groups = vec![("System".to_string(), self.config.keybindings.global.clone())];
        if let Some(keybindings) = self.config.keybindings.pages.get(&active_page_id) {
            groups.push((active_page_id.to_string(), keybindings.clone()));
        }

        f.render_widget(Help::new(groups), rect);

        Ok(())
    }
}
