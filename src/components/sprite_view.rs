use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};

/// Renders sprite rows cell by cell at an offset inside an area.
///
/// Whitespace cells are transparent so overlapping sprites do not punch
/// holes in each other. The offset may be negative or extend past the
/// area; cells outside the area are clipped instead of wrapping.
#[derive(Debug)]
pub struct SpriteView {
    rows: Vec<String>,
    offset: (i32, i32),
    style: Style,
}

impl SpriteView {
    pub fn new(rows: Vec<String>) -> Self {
        Self { rows, offset: (0, 0), style: Style::default() }
    }

    pub fn offset(mut self, col: i32, row: i32) -> Self {
        self.offset = (col, row);
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl Widget for SpriteView {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        for (r, row) in self.rows.iter().enumerate() {
            let y = self.offset.1 + r as i32;
            if y < 0 || y >= area.height as i32 {
                continue;
            }
            for (c, ch) in row.chars().enumerate() {
                if ch.is_whitespace() {
                    continue;
                }
                let x = self.offset.0 + c as i32;
                if x < 0 || x >= area.width as i32 {
                    continue;
                }
                let cell = &mut buf[(area.x + x as u16, area.y + y as u16)];
                cell.set_char(ch);
                cell.set_style(self.style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use ratatui::style::Color;

    use super::*;

    fn render(view: SpriteView, width: u16, height: u16) -> Buffer {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        view.render(area, &mut buf);
        buf
    }

    #[test]
    fn test_draws_rows_at_offset() {
        let view = SpriteView::new(vec!["##".to_string(), "##".to_string()]).offset(1, 1);
        let buf = render(view, 4, 4);
        assert_eq!(buf[(1, 1)].symbol(), "#");
        assert_eq!(buf[(2, 2)].symbol(), "#");
        assert_eq!(buf[(0, 0)].symbol(), " ");
    }

    #[test]
    fn test_whitespace_is_transparent() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 3, 1));
        buf[(1, 0)].set_char('o');
        SpriteView::new(vec!["# #".to_string()]).render(Rect::new(0, 0, 3, 1), &mut buf);
        assert_eq!(buf[(0, 0)].symbol(), "#");
        assert_eq!(buf[(1, 0)].symbol(), "o");
        assert_eq!(buf[(2, 0)].symbol(), "#");
    }

    #[test]
    fn test_clips_outside_area() {
        let view = SpriteView::new(vec!["####".to_string()]).offset(-2, 0);
        let buf = render(view, 3, 1);
        assert_eq!(buf[(0, 0)].symbol(), "#");
        assert_eq!(buf[(1, 0)].symbol(), "#");
        assert_eq!(buf[(2, 0)].symbol(), " ");
    }

    #[test]
    fn test_negative_row_clipped() {
        let view = SpriteView::new(vec!["#".to_string(), "#".to_string()]).offset(0, -1);
        let buf = render(view, 1, 2);
        assert_eq!(buf[(0, 0)].symbol(), "#");
        assert_eq!(buf[(0, 1)].symbol(), " ");
    }

    #[test]
    fn test_applies_style() {
        let view = SpriteView::new(vec!["#".to_string()]).style(Style::default().fg(Color::Yellow));
        let buf = render(view, 1, 1);
        assert_eq!(buf[(0, 0)].style().fg, Some(Color::Yellow));
    }
}
