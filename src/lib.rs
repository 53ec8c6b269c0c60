use std::ops::{Index, IndexMut};

use arrayvec::ArrayVec;

mod fmt;
mod parse;
pub mod solve;

/// Car ids fit one hex digit in the level format; cell value 0 is empty.
pub const MAX_CARS: usize = 15;

/// Row through which cars leave the grid, as used by level files.
pub const EXIT_ROW: u8 = 2;

/// The car that has to reach the exit.
pub const PLAYER: CarId = CarId(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CarId(pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: u8,
    pub y: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Right,
    Down,
    Left,
    Up,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Up => Direction::Down,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Direction::Up => 'w',
            Direction::Left => 'a',
            Direction::Down => 's',
            Direction::Right => 'd',
        }
    }

    pub fn from_letter(ch: char) -> Option<Self> {
        Some(match ch {
            'w' => Direction::Up,
            'a' => Direction::Left,
            's' => Direction::Down,
            'd' => Direction::Right,
            _ => return None,
        })
    }

    fn delta(self) -> (i8, i8) {
        match self {
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Up => (0, -1),
        }
    }

    fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    width: u8,
    height: u8,
    exit_row: u8,
    cells: Box<[u8]>,
}

impl Index<Pos> for Grid {
    type Output = u8;
    fn index(&self, pos: Pos) -> &Self::Output {
        &self.cells[pos.y as usize * self.width as usize + pos.x as usize]
    }
}
impl IndexMut<Pos> for Grid {
    fn index_mut(&mut self, pos: Pos) -> &mut Self::Output {
        &mut self.cells[pos.y as usize * self.width as usize + pos.x as usize]
    }
}

impl Grid {
    pub(crate) fn from_cells(width: u8, height: u8, exit_row: u8, cells: Box<[u8]>) -> Self {
        debug_assert_eq!(cells.len(), width as usize * height as usize);
        Grid {
            width,
            height,
            exit_row,
            cells,
        }
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn exit_row(&self) -> u8 {
        self.exit_row
    }

    pub fn cells(&self) -> impl Iterator<Item = (Pos, u8)> + '_ {
        let idx_iter = std::iter::successors(Some(Pos { x: 0, y: 0 }), |&Pos { x, y }| {
            Some(if x + 1 < self.width {
                Pos { x: x + 1, y }
            } else {
                Pos { x: 0, y: y + 1 }
            })
        });
        idx_iter.zip(self.cells.iter().copied())
    }

    fn sibling_pos(&self, pos: Pos, dir: Direction) -> Option<Pos> {
        let (dx, dy) = dir.delta();
        let x = pos.x.checked_add_signed(dx)?;
        let y = pos.y.checked_add_signed(dy)?;
        (x < self.width && y < self.height).then_some(Pos { x, y })
    }

    /// Deduplication key over the full cell contents. Equal keys iff equal
    /// contents, so the visited table can never confuse two configurations.
    pub fn key(&self) -> GridKey {
        GridKey(self.cells.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GridKey(Box<[u8]>);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Car {
    pub id: CarId,
    pub top_left: Pos,
    pub bottom_right: Pos,
    pub horizontal: bool,
}

impl Car {
    /// The two directions this car can slide in.
    pub fn directions(&self) -> [Direction; 2] {
        if self.horizontal {
            [Direction::Left, Direction::Right]
        } else {
            [Direction::Up, Direction::Down]
        }
    }

    fn contains(&self, pos: Pos) -> bool {
        (self.top_left.x..=self.bottom_right.x).contains(&pos.x)
            && (self.top_left.y..=self.bottom_right.y).contains(&pos.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidateError {
    TooShort(CarId),
    InconsistentShape(CarId),
    NotStraight(CarId),
    PlayerNotInExitRow,
    NoPlayer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepError {
    CrossAxis,
    AtEdge,
    Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Slid,
    Exited,
}

/// A grid together with the cars parked on it. The two are kept in lock-step:
/// every successful [`CarPark::step`] updates both in one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarPark {
    grid: Grid,
    cars: ArrayVec<Car, MAX_CARS>,
}

impl CarPark {
    /// Checks a raw grid structurally and derives its car list.
    pub fn new(grid: Grid) -> Result<Self, ValidateError> {
        let mut cars = ArrayVec::<Car, MAX_CARS>::new();
        for (pos, id) in grid.cells() {
            if id == 0 {
                continue;
            }
            if let Some(car) = cars.iter().find(|car| car.id.0 == id) {
                if !car.contains(pos) {
                    return Err(ValidateError::InconsistentShape(car.id));
                }
                continue;
            }
            cars.push(Self::extract_car(&grid, pos)?);
        }
        if !cars.iter().any(|car| car.id == PLAYER) {
            return Err(ValidateError::NoPlayer);
        }
        cars.sort_unstable_by_key(|car| car.id);
        Ok(CarPark { grid, cars })
    }

    /// Extent of the car covering `seed`, scanned in all four directions.
    fn extract_car(grid: &Grid, seed: Pos) -> Result<Car, ValidateError> {
        let id = grid[seed];
        let scan = |dir: Direction| {
            let mut pos = seed;
            while let Some(next) = grid.sibling_pos(pos, dir).filter(|&next| grid[next] == id) {
                pos = next;
            }
            pos
        };
        let top_left = Pos {
            x: scan(Direction::Left).x,
            y: scan(Direction::Up).y,
        };
        let bottom_right = Pos {
            x: scan(Direction::Right).x,
            y: scan(Direction::Down).y,
        };

        let id = CarId(id);
        let wide = bottom_right.x > top_left.x;
        let tall = bottom_right.y > top_left.y;
        if !wide && !tall {
            return Err(ValidateError::TooShort(id));
        }
        if wide && tall {
            return Err(ValidateError::NotStraight(id));
        }
        if id == PLAYER && !(wide && top_left.y == grid.exit_row) {
            return Err(ValidateError::PlayerNotInExitRow);
        }
        Ok(Car {
            id,
            top_left,
            bottom_right,
            horizontal: wide,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cars(&self) -> &[Car] {
        &self.cars
    }

    pub fn car(&self, id: CarId) -> Option<&Car> {
        self.cars.iter().find(|car| car.id == id)
    }

    /// Slides one car by a single cell, or rejects the step with the park
    /// untouched. Sliding right off the grid in the exit row removes the car.
    pub fn step(&mut self, id: CarId, dir: Direction) -> Result<Step, StepError> {
        let idx = self
            .cars
            .iter()
            .position(|car| car.id == id)
            .expect("car is parked in the grid");
        let car = self.cars[idx];
        if car.horizontal != dir.is_horizontal() {
            return Err(StepError::CrossAxis);
        }
        let (lead, trail) = match dir {
            Direction::Right | Direction::Down => (car.bottom_right, car.top_left),
            Direction::Left | Direction::Up => (car.top_left, car.bottom_right),
        };
        let Some(dest) = self.grid.sibling_pos(lead, dir) else {
            if dir == Direction::Right && lead.y == self.grid.exit_row {
                for x in car.top_left.x..=car.bottom_right.x {
                    self.grid[Pos { x, y: lead.y }] = 0;
                }
                self.cars.remove(idx);
                return Ok(Step::Exited);
            }
            return Err(StepError::AtEdge);
        };
        if self.grid[dest] != 0 {
            return Err(StepError::Blocked);
        }

        self.grid[dest] = id.0;
        self.grid[trail] = 0;
        let car = &mut self.cars[idx];
        match dir {
            Direction::Right => {
                car.top_left.x += 1;
                car.bottom_right.x += 1;
            }
            Direction::Down => {
                car.top_left.y += 1;
                car.bottom_right.y += 1;
            }
            Direction::Left => {
                car.top_left.x -= 1;
                car.bottom_right.x -= 1;
            }
            Direction::Up => {
                car.top_left.y -= 1;
                car.bottom_right.y -= 1;
            }
        }
        Ok(Step::Slid)
    }
}

/// One level file: the raw grid plus the recorded minimal turn count, if the
/// file carries one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    pub grid: Grid,
    pub min_turns: Option<u32>,
}
