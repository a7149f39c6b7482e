use lifemesh_core::{Frame, TileStatus};
use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

/// Draws a [`Frame`] as shaded blocks, scaled down to fit the area.
pub struct FrameWidget<'a> {
    frame: &'a Frame,
}

impl<'a> FrameWidget<'a> {
    pub fn new(frame: &'a Frame) -> Self {
        Self { frame }
    }

    pub fn glyph(intensity: u8) -> char {
        match intensity {
            0 => ' ',
            1..=63 => '░',
            64..=127 => '▒',
            128..=191 => '▓',
            _ => '█',
        }
    }

    /// Source pixel for terminal column/row `i` of `cells`, given a frame
    /// dimension of `pixels`.
    fn sample(i: u16, cells: u16, pixels: usize) -> usize {
        let cells = usize::from(cells.max(1));
        if pixels <= cells {
            usize::from(i)
        } else {
            usize::from(i) * pixels / cells
        }
    }
}

impl Widget for FrameWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (fw, fh) = (self.frame.width(), self.frame.height());
        for row in 0..area.height {
            let y = Self::sample(row, area.height, fh);
            if y >= fh {
                break;
            }
            for col in 0..area.width {
                let x = Self::sample(col, area.width, fw);
                if x >= fw {
                    break;
                }
                let v = self.frame.pixel(x, y);
                if let Some(cell) = buf.cell_mut(Position::new(area.x + col, area.y + row)) {
                    cell.set_char(Self::glyph(v))
                        .set_fg(Color::Rgb(v / 3, v, v / 2));
                }
            }
        }
    }
}

/// One-line summary under the picture.
pub struct StatusLine<'a> {
    status: &'a TileStatus,
}

impl<'a> StatusLine<'a> {
    pub fn new(status: &'a TileStatus) -> Self {
        Self { status }
    }

    pub fn text(&self) -> String {
        let s = self.status;
        let links: String = s
            .fresh_links
            .iter()
            .map(|d| d.to_string().chars().next().unwrap_or('?').to_ascii_uppercase())
            .collect();
        format!(
            "{} [{}] gen {} | live {} | links {}/{} {} | band {} | {} | q quit, +/- band",
            s.name,
            s.fingerprint,
            s.generation,
            s.live_cells,
            s.fresh_links.len(),
            s.linked,
            links,
            s.thickness,
            s.rules,
        )
    }
}

impl Widget for StatusLine<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = Line::from(vec![Span::styled(
            self.text(),
            Style::default().fg(Color::Black).bg(Color::Gray),
        )]);
        Paragraph::new(line).render(area, buf);
    }
}
