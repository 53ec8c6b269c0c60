use anyhow::{ensure, Context};
use carpark_solver::{solve, CarPark, Level, PLAYER};

use crate::common::*;

mod common;

fn main() {
    run_tests("solve", |content| {
        let input = content
            .split_once(SEPARATOR)
            .map_or(content, |(input, _)| input)
            .trim();
        let level = input.parse::<Level>().context("Invalid level")?;
        let mut park = CarPark::new(level.grid).context("Invalid car park")?;

        let Some(turns) = solve::shortest(&park, || {}) else {
            return Ok(format!("{input}\n\n{SEPARATOR}unsolvable\n"));
        };

        // Validate.
        for turn in &turns {
            for _ in 0..turn.steps {
                park.step(turn.car, turn.dir).context("Invalid solution")?;
            }
        }
        ensure!(park.car(PLAYER).is_none(), "Invalid solution");

        let moves = turns.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ");
        Ok(format!("{input}\n\n{SEPARATOR}{} turns: {moves}\n", turns.len()))
    });
}
