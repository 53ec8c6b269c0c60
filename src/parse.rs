use std::str::FromStr;

use anyhow::{ensure, Context, Result};

use crate::solve::Turn;
use crate::{CarId, Direction, Grid, Level, EXIT_ROW};

impl FromStr for Level {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s.lines().map(str::trim).filter(|line| !line.is_empty());

        let first = lines.next().context("Empty level")?;
        let width = first.chars().count();
        let mut cells = Vec::new();
        let mut parse_row = |row: usize, line: &str| -> Result<()> {
            for (x, ch) in line.chars().enumerate() {
                let id = ch
                    .to_digit(16)
                    .with_context(|| format!("Invalid cell {ch:?} at row {row}, column {x}"))?;
                cells.push(id as u8);
            }
            Ok(())
        };

        parse_row(0, first)?;
        let mut height = 1;
        let mut min_turns = None;
        while let Some(line) = lines.next() {
            // A final line of a different width is the recorded turn count.
            if line.chars().count() != width {
                let turns = line.parse::<u32>().with_context(|| {
                    format!("Trailing line {line:?} is neither a row of width {width} nor a turn count")
                })?;
                min_turns = Some(turns);
                ensure!(lines.next().is_none(), "Content after the turn count line");
                break;
            }
            parse_row(height, line)?;
            height += 1;
        }

        let width = u8::try_from(width).context("Car park is too wide")?;
        let height = u8::try_from(height).context("Car park is too tall")?;
        Ok(Level {
            grid: Grid::from_cells(width, height, EXIT_ROW, cells.into()),
            min_turns,
        })
    }
}

impl FromStr for Turn {
    type Err = anyhow::Error;

    /// The play-mode grammar: a decimal car number followed by one direction
    /// letter per cell, e.g. `3dd` slides car 3 two cells to the right.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|ch: char| !ch.is_ascii_digit())
            .context("Missing direction letters")?;
        let (digits, letters) = s.split_at(split);
        let car = digits.parse::<u8>().context("Missing car number")?;
        ensure!(car >= 1, "Car numbers start at 1");

        let mut letters = letters.chars();
        let first = letters.next().context("Missing direction letters")?;
        let dir =
            Direction::from_letter(first).with_context(|| format!("Unknown direction {first:?}"))?;
        let mut steps = 1u8;
        for ch in letters {
            ensure!(ch == first, "Mixed directions in one turn");
            steps = steps.checked_add(1).context("Turn is too long")?;
        }
        Ok(Turn {
            car: CarId(car),
            dir,
            steps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_round_trips_through_display() {
        let text = "000000\n000002\n000112\n000033\n000000\n000000\n2\n";
        let level = text.parse::<Level>().unwrap();
        assert_eq!(level.min_turns, Some(2));
        assert_eq!(level.grid.width(), 6);
        assert_eq!(level.grid.height(), 6);
        assert_eq!(level.to_string(), text);
    }

    #[test]
    fn count_line_is_optional() {
        let level = "0000\n0000\n1100".parse::<Level>().unwrap();
        assert_eq!(level.min_turns, None);
        assert_eq!(level.grid.height(), 3);
    }

    #[test]
    fn rejects_bad_cells_and_trailing_junk() {
        assert!("00g0\n1100\n0000".parse::<Level>().is_err());
        assert!("0000\n1100\n0000\n2\nxx".parse::<Level>().is_err());
        assert!("".parse::<Level>().is_err());
    }

    #[test]
    fn turn_grammar() {
        let turn = "3dd".parse::<Turn>().unwrap();
        assert_eq!(
            turn,
            Turn {
                car: CarId(3),
                dir: Direction::Right,
                steps: 2,
            },
        );
        assert_eq!(turn.to_string(), "3dd");
        assert!("dd".parse::<Turn>().is_err());
        assert!("3".parse::<Turn>().is_err());
        assert!("3ws".parse::<Turn>().is_err());
        assert!("0d".parse::<Turn>().is_err());
    }
}
