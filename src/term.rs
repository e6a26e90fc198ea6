use crate::{TermInt, Coords};
use crate::snake::Position;
use crate::state::Board;
use std::{io::{Stdout, Write, stdout}, time::Duration};

use anyhow::{Context, Result};
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::style::Color;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};

/// Terminal columns used to draw one grid cell, so cells come out roughly square
const CELL_COLUMNS: TermInt = 2;

type ScreenChar = (char, Color);

pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    screen: Vec<ScreenChar>,
    current_msg: Option<Message>,
}

struct Message {
    top_left: Coords,
    width: TermInt,
    height: TermInt,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size().context("Error reading terminal size")?;
        let stdout = stdout();
        let screen = vec![(' ', Color::Reset); width as usize * height as usize];
        Ok(TermManager { width, height, stdout, screen, current_msg: None })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen).context("Error entering alt screen")?;
        self.set_raw_mode(true)?;
        self.set_cursor_visibility(false)?;
        self.set_cursor_blink(false)
    }

    pub fn restore(&mut self) -> Result<()> {
        self.set_raw_mode(false)?;
        self.set_cursor_visibility(true)?;
        self.set_cursor_blink(true)?;
        execute!(self.stdout, LeaveAlternateScreen).context("Error leaving alt screen")?;
        Ok(())
    }

    pub fn read_key_blocking(&self) -> Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read().context("Error reading key")? {
                return Ok(ev);
            }
        }
    }

    /// Waits up to `timeout` for the first event, then drains whatever else is queued.
    pub fn read_events(&self, timeout: Duration) -> Result<Vec<Event>> {
        let mut events = vec![];
        let mut wait = timeout;

        while poll(wait).context("Error polling events")? {
            events.push(read().context("Error reading event")?);
            wait = Duration::from_millis(0);
        }

        Ok(events)
    }

    pub fn get_terminal_size(&self) -> Coords {
        (self.width, self.height)
    }

    pub fn resize(&mut self, width: TermInt, height: TermInt) -> Result<()> {
        self.width = width;
        self.height = height;
        self.current_msg = None;
        self.clear()
    }

    /// Play area inside the borders, in board units.
    pub fn board(&self, cell_size: i32) -> Board {
        board_for_size(self.get_terminal_size(), cell_size)
    }

    pub fn draw_borders(&mut self) -> Result<()> {
        let (width, height) = (self.width, self.height);
        if width < 2 || height < 2 {
            return Ok(());
        }

        let end_x = width - 1;
        let end_y = height - 1;

        for x in 0..width {
            let ch = if x == 0 || x == width - 1 {'+'} else {'-'};
            self.print_at((x, 0), ch, Color::Reset)?;
            self.print_at((x, end_y), ch, Color::Reset)?;
        }

        for y in 1..height - 1 {
            self.print_at((0, y), '|', Color::Reset)?;
            self.print_at((end_x, y), '|', Color::Reset)?;
        }

        self.flush()
    }

    pub fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        if self.has_message() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let center = (self.width / 2, self.height / 2);
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));

        // Print the top and bottom empty lines
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, *y), ' ')?;
            }
        }

        // Print the message lines
        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as TermInt, y), ch)?;
            }
        }

        self.current_msg = Some(Message::new(msg_width, msg_height, top_left));
        self.flush()
    }

    pub fn hide_message(&mut self) -> Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };
        let top_left = msg.top_left();

        // Restore the content from the screen buffer
        for y_diff in 0..msg.height() {
            for x_diff in 0..msg.width() {
                let (x, y) = (top_left.0 + x_diff, top_left.1 + y_diff);
                if let Some((ch, color)) = self.screen_at((x, y)) {
                    queue!(self.stdout, cursor::MoveTo(x, y), style::SetForegroundColor(color), style::Print(ch))?;
                }
            }
        }

        queue!(self.stdout, style::ResetColor)?;
        self.flush()
    }

    /// Draws one grid cell at a board position. Positions off screen are skipped.
    pub fn print_cell(&mut self, pos: Position, cell_size: i32, ch: char, color: Color) -> Result<()> {
        if let Some((x, y)) = cell_coords(pos, cell_size) {
            for x_diff in 0..CELL_COLUMNS {
                self.print_at((x + x_diff, y), ch, color)?;
            }
        }

        Ok(())
    }

    pub fn print_at(&mut self, pos: Coords, ch: char, color: Color) -> Result<()> {
        let idx = match self.screen_index(pos) {
            Some(idx) => idx,
            None => return Ok(()),
        };

        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::SetForegroundColor(color), style::Print(ch), style::ResetColor)?;
        self.screen[idx] = (ch, color);
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All)).context("Error clearing")?;
        self.screen = vec![(' ', Color::Reset); self.width as usize * self.height as usize];
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush().context("Error flushing")
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn screen_index(&self, pos: Coords) -> Option<usize> {
        if pos.0 >= self.width || pos.1 >= self.height {
            return None;
        }

        Some(self.width as usize * pos.1 as usize + pos.0 as usize)
    }

    fn screen_at(&self, pos: Coords) -> Option<ScreenChar> {
        self.screen_index(pos).map(|idx| self.screen[idx])
    }

    fn print_at_no_save(&mut self, pos: Coords, ch: char) -> Result<()> {
        // To be used for printing messages, where we don't wanna overwrite our
        // local buffer to restore it when the message is hidden
        if self.screen_index(pos).is_some() {
            queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))?;
        }

        Ok(())
    }

    fn set_raw_mode(&self, option: bool) -> Result<()> {
        let res = if option {
            terminal::enable_raw_mode()
        } else {
            terminal::disable_raw_mode()
        };

        res.context("Error setting raw mode")
    }

    fn set_cursor_blink(&mut self, option: bool) -> Result<()> {
        let res = if option {
            execute!(self.stdout, cursor::EnableBlinking)
        } else {
            execute!(self.stdout, cursor::DisableBlinking)
        };

        res.context("Error setting cursor blink")
    }

    fn set_cursor_visibility(&mut self, option: bool) -> Result<()> {
        let res = if option {
            execute!(self.stdout, cursor::Show)
        } else {
            execute!(self.stdout, cursor::Hide)
        };

        res.context("Error setting cursor visibility")
    }
}

impl Message {
    pub fn new(width: TermInt, height: TermInt, top_left: Coords) -> Self {
        Message { width, height, top_left }
    }

    pub fn width(&self) -> TermInt {
        self.width
    }

    pub fn height(&self) -> TermInt {
        self.height
    }

    pub fn top_left(&self) -> Coords {
        self.top_left
    }
}

/// Board that fits inside a bordered terminal of `size`.
pub fn board_for_size(size: Coords, cell_size: i32) -> Board {
    let cols = size.0.saturating_sub(2) / CELL_COLUMNS;
    let rows = size.1.saturating_sub(2);
    Board::new((cols as i32).saturating_mul(cell_size), (rows as i32).saturating_mul(cell_size))
}

/// Top-left terminal character of the cell holding `pos`.
pub fn cell_coords(pos: Position, cell_size: i32) -> Option<Coords> {
    if pos.x < 0 || pos.y < 0 {
        return None;
    }

    let x = 1 + (pos.x as i64 / cell_size as i64) * CELL_COLUMNS as i64;
    let y = 1 + pos.y as i64 / cell_size as i64;

    if x + CELL_COLUMNS as i64 > TermInt::MAX as i64 || y > TermInt::MAX as i64 {
        return None;
    }

    Some((x as TermInt, y as TermInt))
}
