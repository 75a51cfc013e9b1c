//! Text-art sprites and their collision silhouettes.
//!
//! A sprite is a rectangular grid of characters; a cell is solid iff its
//! character is non-whitespace. The mask is derived once at construction and
//! reused for every overlap test, so hitboxes follow the exact visible
//! silhouette rather than the bounding box.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    rows: Vec<String>,
    mask: Vec<Vec<bool>>,
    width: u16,
    height: u16,
}

impl Sprite {
    /// Parses multi-line art the way the render layers are written: empty
    /// lines (from the raw-string delimiters) are dropped, every kept row is
    /// padded with spaces to the widest one.
    pub fn from_text(text: &str) -> Self {
        let rows: Vec<&str> = text.lines().filter(|line| !line.is_empty()).collect();
        let width = rows.iter().map(|line| line.chars().count()).max().unwrap_or(0);

        let cells: Vec<Vec<char>> = rows
            .into_iter()
            .map(|line| {
                let mut chars: Vec<char> = line.chars().collect();
                chars.resize(width, ' ');
                chars
            })
            .collect();

        Self::from_cells(cells)
    }

    fn from_cells(cells: Vec<Vec<char>>) -> Self {
        let height = cells.len() as u16;
        let width = cells.first().map(|row| row.len()).unwrap_or(0) as u16;
        let mask = cells.iter().map(|row| row.iter().map(|c| !c.is_whitespace()).collect()).collect();
        let rows = cells.into_iter().map(|row| row.into_iter().collect()).collect();

        Sprite { rows, mask, width, height }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Whether the cell at (col, row) is part of the silhouette. Out-of-range
    /// coordinates are transparent.
    pub fn is_solid(&self, col: u16, row: u16) -> bool {
        self.mask.get(row as usize).map(|r| r.get(col as usize).copied().unwrap_or(false)).unwrap_or(false)
    }

    /// Nearest-neighbour rescale to the given cell dimensions. Produces a
    /// fresh sprite with its own mask; callers cache the result and only
    /// rescale on growth events.
    pub fn scaled(&self, width: u16, height: u16) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        if width == self.width && height == self.height {
            return self.clone();
        }

        let src: Vec<Vec<char>> = self.rows.iter().map(|row| row.chars().collect()).collect();
        let cells: Vec<Vec<char>> = (0..height)
            .map(|r| {
                let src_r = (r as usize * self.height as usize) / height as usize;
                (0..width)
                    .map(|c| {
                        let src_c = (c as usize * self.width as usize) / width as usize;
                        src[src_r][src_c]
                    })
                    .collect()
            })
            .collect();

        Self::from_cells(cells)
    }

    /// The silhouette as drawable rows, for the hitbox overlay.
    pub fn mask_rows(&self) -> Vec<String> {
        self.mask.iter().map(|row| row.iter().map(|solid| if *solid { '▒' } else { ' ' }).collect()).collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const ARROW: &str = "
 ^
<.>
 v
";

    #[test]
    fn test_from_text_dimensions() {
        let sprite = Sprite::from_text(ARROW);
        assert_eq!(sprite.width(), 3);
        assert_eq!(sprite.height(), 3);
    }

    #[test]
    fn test_mask_follows_whitespace() {
        let sprite = Sprite::from_text(ARROW);
        assert!(sprite.is_solid(1, 0));
        assert!(!sprite.is_solid(0, 0));
        assert!(sprite.is_solid(0, 1));
        assert!(!sprite.is_solid(2, 2));
    }

    #[test]
    fn test_out_of_range_is_transparent() {
        let sprite = Sprite::from_text(ARROW);
        assert!(!sprite.is_solid(3, 0));
        assert!(!sprite.is_solid(0, 3));
    }

    #[test]
    fn test_ragged_rows_padded() {
        let sprite = Sprite::from_text("##\n####\n");
        assert_eq!(sprite.width(), 4);
        assert!(!sprite.is_solid(2, 0));
        assert!(sprite.is_solid(2, 1));
    }

    #[test]
    fn test_scaled_doubles() {
        let sprite = Sprite::from_text("#.\n.#\n");
        let scaled = sprite.scaled(4, 4);
        assert_eq!(scaled.width(), 4);
        assert_eq!(scaled.height(), 4);
        // Each source cell becomes a 2x2 block.
        assert_eq!(scaled.rows()[0], "##..");
        assert_eq!(scaled.rows()[3], "..##");
    }

    #[test]
    fn test_scaled_clamps_to_one_cell() {
        let sprite = Sprite::from_text("##\n##\n");
        let scaled = sprite.scaled(0, 0);
        assert_eq!((scaled.width(), scaled.height()), (1, 1));
    }

    #[test]
    fn test_scaled_identity_keeps_rows() {
        let sprite = Sprite::from_text(ARROW);
        assert_eq!(sprite.scaled(3, 3), sprite);
    }

    #[test]
    fn test_mask_rows_shape() {
        let sprite = Sprite::from_text(ARROW);
        assert_eq!(sprite.mask_rows(), vec![" ▒ ".to_string(), "▒▒▒".to_string(), " ▒ ".to_string()]);
    }
}
