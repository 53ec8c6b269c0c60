use std::fmt::Write;

use anyhow::{ensure, Context};
use carpark_solver::solve::Turn;
use carpark_solver::{CarPark, Level, Step};
use common::*;

mod common;

fn main() {
    run_tests("move", |content| {
        let input = content
            .split_once(SEPARATOR)
            .map_or(content, |(input, _)| input)
            .trim();
        let (turns, rows) = input.split_once('\n').context("No turns")?;
        ensure!(!turns.trim().is_empty(), "No turns");

        let level = rows.parse::<Level>().context("Invalid level")?;
        let mut park = CarPark::new(level.grid).context("Invalid car park")?;
        let mut got = format!("{input}\n\n{SEPARATOR}");
        for (word, i) in turns.split_whitespace().zip(1..) {
            let turn = word
                .parse::<Turn>()
                .with_context(|| format!("Invalid turn {i} {word:?}"))?;
            for step in 1..=turn.steps {
                let outcome = park
                    .step(turn.car, turn.dir)
                    .with_context(|| format!("Failed to perform step {step} of turn {i} {turn}"))?;
                write!(got, "{park}{SEPARATOR}").unwrap();
                if outcome == Step::Exited {
                    break;
                }
            }
        }

        Ok(got)
    });
}
