use std::fmt;

use crate::solve::Turn;
use crate::{CarPark, Grid, Level, Pos, StepError, ValidateError, PLAYER};

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pos, id) in self.cells() {
            if pos.x == 0 && pos.y != 0 {
                "\n".fmt(f)?;
            }
            write!(f, "{id:x}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.grid)?;
        if let Some(turns) = self.min_turns {
            writeln!(f, "{turns}")?;
        }
        Ok(())
    }
}

impl fmt::Display for CarPark {
    /// The play-mode board. The border is open at the exit row; once the
    /// player car has left, it is drawn outside the park.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grid = self.grid();
        let rule = "-".repeat(grid.width() as usize * 3 + 1);
        writeln!(f, "+{rule}+")?;
        for y in 0..grid.height() {
            "| ".fmt(f)?;
            for x in 0..grid.width() {
                if x != 0 {
                    " ".fmt(f)?;
                }
                let id = grid[Pos { x, y }];
                if id == 0 {
                    " .".fmt(f)?;
                } else {
                    write!(f, "{id:>2}")?;
                }
            }
            if y == grid.exit_row() {
                " .".fmt(f)?;
                if self.car(PLAYER).is_none() {
                    " 1 1".fmt(f)?;
                }
            } else {
                " |".fmt(f)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "+{rule}+")
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.car.0)?;
        for _ in 0..self.steps {
            write!(f, "{}", self.dir.letter())?;
        }
        Ok(())
    }
}

impl fmt::Display for ValidateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidateError::TooShort(id) => {
                write!(f, "car {} covers a single cell, cars are at least two long", id.0)
            }
            ValidateError::InconsistentShape(id) => {
                write!(f, "car {} reappears outside its own outline", id.0)
            }
            ValidateError::NotStraight(id) => {
                write!(f, "car {} is neither a single row nor a single column", id.0)
            }
            ValidateError::PlayerNotInExitRow => {
                write!(f, "car {} must lie flat in the exit row", PLAYER.0)
            }
            ValidateError::NoPlayer => {
                write!(f, "car {} is missing from the car park", PLAYER.0)
            }
        }
    }
}

impl std::error::Error for ValidateError {}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StepError::CrossAxis => "cars only slide along their own axis",
            StepError::AtEdge => "the car is already at the edge of the car park",
            StepError::Blocked => "another car is blocking the way",
        })
    }
}

impl std::error::Error for StepError {}
