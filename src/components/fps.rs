use std::time::Instant;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::{Paragraph, Widget},
};

#[derive(Debug)]
pub struct FpsCounter {
    tick_start: Instant,
    ticks: u32,
    ticks_per_second: f64,
    frame_start: Instant,
    frames: u32,
    frames_per_second: f64,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            tick_start: Instant::now(),
            ticks: 0,
            ticks_per_second: 0.0,
            frame_start: Instant::now(),
            frames: 0,
            frames_per_second: 0.0,
        }
    }

    pub fn on_tick(&mut self) {
        self.ticks += 1;
        let elapsed = self.tick_start.elapsed().as_secs_f64();
        if elapsed >= 1.0 {
            self.ticks_per_second = self.ticks as f64 / elapsed;
            self.tick_start = Instant::now();
            self.ticks = 0;
        }
    }

    pub fn on_frame(&mut self) {
        self.frames += 1;
        let elapsed = self.frame_start.elapsed().as_secs_f64();
        if elapsed >= 1.0 {
            self.frames_per_second = self.frames as f64 / elapsed;
            self.frame_start = Instant::now();
            self.frames = 0;
        }
    }
}

impl Widget for &FpsCounter {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let text = format!("{:.2} ticks/s {:.2} fps", self.ticks_per_second, self.frames_per_second);
        Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Right)
            .render(area, buf);
    }
}
