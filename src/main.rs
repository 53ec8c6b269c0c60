use std::path::{Path, PathBuf};

use anyhow::{bail, ensure, Context, Result};
use console::{style, Term};
use indicatif::ProgressBar;
use rayon::prelude::*;

use carpark_solver::solve::{self, Turn};
use carpark_solver::{CarPark, Level, Step, PLAYER};

const DEFAULT_LEVEL_DIR: &str = "levels";

fn main() -> Result<()> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    match args.first().map(String::as_str) {
        Some("solve") => {
            let path = args.get(1).context("Usage: carpark-solver solve FILE")?;
            cmd_solve(Path::new(path))
        }
        Some("check") => {
            let write = args.iter().any(|arg| arg == "--write");
            let dir = args[1..].iter().find(|arg| !arg.starts_with('-'));
            cmd_check(Path::new(dir.map_or(DEFAULT_LEVEL_DIR, String::as_str)), write)
        }
        Some(dir) => cmd_play(Path::new(dir)),
        None => cmd_play(Path::new(DEFAULT_LEVEL_DIR)),
    }
}

fn load_levels(dir: &Path) -> Result<Vec<(PathBuf, Level)>> {
    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read level directory {}", dir.display()))?
        .map(|entry| Ok(entry?.path()))
        .collect::<Result<Vec<_>>>()?;
    paths.sort();

    let mut levels = Vec::new();
    for path in paths {
        if path.extension().map_or(true, |ext| ext != "level") {
            continue;
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let level = content
            .parse::<Level>()
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        levels.push((path, level));
    }
    ensure!(!levels.is_empty(), "No .level files in {}", dir.display());
    Ok(levels)
}

fn level_name(path: &Path) -> String {
    path.file_stem().unwrap_or_default().to_string_lossy().into_owned()
}

fn cmd_play(dir: &Path) -> Result<()> {
    let levels = load_levels(dir)?;
    let term = Term::stdout();
    for ((path, _), i) in levels.iter().zip(1..) {
        term.write_line(&format!("{i}. {}", level_name(path)))?;
    }
    term.write_str(&format!("Choose a level (1-{}): ", levels.len()))?;
    let choice = term.read_line()?;
    let Some(index) = choice
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=levels.len()).contains(n))
    else {
        bail!("Invalid level choice");
    };

    let level = &levels[index - 1].1;
    let init = CarPark::new(level.grid.clone()).context("Invalid level")?;
    if let Some(turns) = level.min_turns {
        term.write_line(&format!("This level is solvable in {turns} turns."))?;
    }

    let mut park = init.clone();
    let mut history = Vec::new();
    loop {
        term.write_line(&park.to_string())?;
        if park.car(PLAYER).is_none() {
            let won = style("You drove your car out of the car park. You win!").green().bold();
            term.write_line(&won.to_string())?;
            break;
        }

        term.write_str("Your turn: ")?;
        let input = term.read_line()?;
        match input.trim() {
            "" => continue,
            "q" => break,
            "z" => {
                if let Some(prev) = history.pop() {
                    park = prev;
                }
                continue;
            }
            "r" => {
                history.push(park.clone());
                park = init.clone();
                continue;
            }
            input => {
                let turn = match input.parse::<Turn>() {
                    Ok(turn) => turn,
                    Err(err) => {
                        let msg = format!("Input must be like '3dd' (car 3, two cells right): {err:#}");
                        term.write_line(&style(msg).red().to_string())?;
                        continue;
                    }
                };
                if park.car(turn.car).is_none() {
                    term.write_line(&format!("Car {} is not in the car park.", turn.car.0))?;
                    continue;
                }
                history.push(park.clone());
                let mut exited = false;
                for _ in 0..turn.steps {
                    match park.step(turn.car, turn.dir) {
                        Ok(Step::Slid) => {}
                        Ok(Step::Exited) => {
                            exited = true;
                            break;
                        }
                        Err(err) => {
                            term.write_line(&style(err).red().to_string())?;
                            break;
                        }
                    }
                }
                if exited && turn.car != PLAYER {
                    term.write_line(&park.to_string())?;
                    let msg = format!("Car {} drove off instead of yours. That was not supposed to happen!", turn.car.0);
                    term.write_line(&style(msg).yellow().to_string())?;
                    break;
                }
            }
        }
    }
    Ok(())
}

fn cmd_solve(path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let level = content
        .parse::<Level>()
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    let park = CarPark::new(level.grid).context("Invalid level")?;

    let bar = ProgressBar::new_spinner();
    let mut steps = 0u64;
    let solution = solve::shortest(&park, || {
        steps += 1;
        if steps % 10_000 == 0 {
            bar.set_message(format!("{steps} unit steps tried"));
            bar.tick();
        }
    });
    bar.finish_and_clear();

    match solution {
        Some(turns) => {
            let moves = turns.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ");
            println!("Solved in {} turns: {moves}", turns.len());
            Ok(())
        }
        None => {
            println!("This level cannot be solved.");
            std::process::exit(1);
        }
    }
}

fn cmd_check(dir: &Path, write: bool) -> Result<()> {
    let levels = load_levels(dir)?;

    let bar = ProgressBar::new(levels.len() as u64);
    let outcomes = levels
        .par_iter()
        .map(|(_, level)| {
            let outcome = check_level(level);
            bar.inc(1);
            outcome
        })
        .collect::<Vec<_>>();
    bar.finish_and_clear();

    let mut failed = 0;
    for ((path, level), outcome) in levels.iter().zip(&outcomes) {
        let name = level_name(path);
        match outcome {
            Ok(turns) => {
                println!("{name}: {} in {} turns", style("solvable").green(), turns.len());
                if write {
                    let annotated = Level {
                        grid: level.grid.clone(),
                        min_turns: Some(turns.len() as u32),
                    };
                    std::fs::write(path, annotated.to_string())
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                }
            }
            Err(reason) => {
                println!("{name}: {}", style(reason).red());
                failed += 1;
            }
        }
    }

    if failed != 0 {
        eprintln!("{failed}/{} levels failed", levels.len());
        std::process::exit(1);
    }
    Ok(())
}

fn check_level(level: &Level) -> Result<Vec<Turn>, String> {
    let park = CarPark::new(level.grid.clone()).map_err(|err| err.to_string())?;
    solve::shortest(&park, || {}).ok_or_else(|| "unsolvable".to_owned())
}
