//! Plain-text board rendering of a [`Snapshot`].
//!
//! Used by the `sim` command for frame dumps and by the TUI for the board
//! widget. Player units are upper case, enemy units lower case.

use std::fmt::Write as _;

use crate::game::lane::{FIELD_HEIGHT, RIVER_Y};
use crate::game::{Snapshot, Team, LANE_COUNT};

/// Characters per lane column.
pub const LANE_WIDTH: usize = 9;

fn glyph(archetype: &str, team: Team) -> char {
    let c = match archetype {
        "scout" => 's',
        "tank" => 't',
        "spark" => 'k',
        "healer" => 'h',
        _ => '?',
    };
    match team {
        Team::Player => c.to_ascii_uppercase(),
        Team::Enemy => c,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn row_of(y: f32, rows: usize) -> usize {
    let r = (y / FIELD_HEIGHT * rows as f32).floor();
    (r.max(0.0) as usize).min(rows - 1)
}

/// Draw the field as `rows` lines of text, top (enemy side) first.
#[must_use]
pub fn board(snapshot: &Snapshot, rows: usize) -> Vec<String> {
    let rows = rows.max(3);
    let width = LANE_WIDTH * LANE_COUNT;
    let mut grid = vec![vec![' '; width]; rows];
    let col = |lane: usize| lane * LANE_WIDTH + LANE_WIDTH / 2;

    for lane in 0..LANE_COUNT {
        grid[row_of(RIVER_Y, rows)][lane * LANE_WIDTH..(lane + 1) * LANE_WIDTH].fill('~');
        for line in &mut grid {
            line[lane * LANE_WIDTH] = '|';
        }
    }

    for tower in &snapshot.towers {
        let mark = if tower.health_ratio > 0.0 { '#' } else { 'x' };
        grid[row_of(tower.y, rows)][col(tower.lane.index())] = mark;
    }

    let crystal = &snapshot.crystal;
    let mark = if crystal.health > 0.0 { '*' } else { 'o' };
    grid[row_of(crystal.y, rows)][col(1)] = mark;

    for unit in &snapshot.units {
        let cell = &mut grid[row_of(unit.y, rows)][col(unit.lane.index())];
        let g = glyph(unit.archetype, unit.team);
        // Two opposing units sharing a cell are fighting.
        *cell = if cell.is_ascii_alphabetic() && cell.is_ascii_uppercase() != g.is_ascii_uppercase()
        {
            '!'
        } else {
            g
        };
    }

    grid.into_iter().map(|line| line.into_iter().collect()).collect()
}

/// One-line summary of time, mana, towers and the crystal.
#[must_use]
pub fn status_line(snapshot: &Snapshot) -> String {
    let towers = |team: Team| {
        snapshot
            .towers
            .iter()
            .filter(|t| t.team == team && t.health_ratio > 0.0)
            .count()
    };
    let mut line = format!(
        "t={:5.1}s  mana P {:4.1}/{:.0} E {:4.1}/{:.0}  towers P{} E{}  crystal {:.0}",
        snapshot.time,
        snapshot.player_mana,
        snapshot.mana_cap,
        snapshot.enemy_mana,
        snapshot.mana_cap,
        towers(Team::Player),
        towers(Team::Enemy),
        snapshot.crystal.health,
    );
    if let Some(team) = snapshot.crystal.last_hit_by {
        let _ = write!(line, " (last {})", team.tag());
    }
    if let Some(outcome) = snapshot.outcome {
        let _ = write!(line, "  [{outcome}]");
    }
    line
}
