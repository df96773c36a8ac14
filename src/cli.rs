use std::io::Read;

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use serde_json::{json, Value};

use crate::adapter::GridConfig;
use crate::core::{BattleGrid, ColorMatrix, SequentialIds, SimpleRng};
use crate::engine::{generate_match_free_matrix, mark_matched_blocks, matrix_has_matches};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print a freshly generated board
    Generate(GridConfig),
    /// Read a color matrix from stdin and report its matches
    Check,
    Help,
}

pub const USAGE: &str = "\
usage: blockwars generate [--rows N] [--cols N] [--seed N] [--palette a,b,c]
       blockwars check < matrix.json";

/// Parse arguments (without the program name) on top of `base`
pub fn parse_args(args: &[String], base: GridConfig) -> Result<Command> {
    let Some(first) = args.first() else {
        return Ok(Command::Help);
    };

    match first.as_str() {
        "generate" => {}
        "check" => {
            if let Some(extra) = args.get(1) {
                return Err(anyhow!("check: unknown argument: {}", extra));
            }
            return Ok(Command::Check);
        }
        "help" | "--help" | "-h" => return Ok(Command::Help),
        other => return Err(anyhow!("unknown command: {}", other)),
    }

    let mut config = base;
    let mut i = 1usize;
    while i < args.len() {
        let flag = args[i].as_str();
        i += 1;
        let value = || {
            args.get(i)
                .ok_or_else(|| anyhow!("generate: missing value for {}", flag))
        };
        match flag {
            "--rows" => config.set_rows(value()?)?,
            "--cols" => config.set_cols(value()?)?,
            "--seed" => config.set_seed(value()?)?,
            "--palette" => config.set_palette(value()?)?,
            other => return Err(anyhow!("generate: unknown argument: {}", other)),
        }
        i += 1;
    }

    Ok(Command::Generate(config))
}

/// Generate a match-free board as JSON
pub fn generate(config: &GridConfig) -> Value {
    debug!(
        "generating {}x{} board, seed {}, palette {:?}",
        config.rows,
        config.cols,
        config.seed,
        config.palette.colors()
    );
    let grid = BattleGrid::new(config.rows, config.cols);
    let mut rng = SimpleRng::new(config.seed);
    let matrix = generate_match_free_matrix(&grid, Some(&config.palette), &mut rng);
    json!({
        "rows": config.rows,
        "cols": config.cols,
        "seed": config.seed,
        "matrix": matrix,
        "hasMatches": matrix_has_matches(&matrix),
    })
}

/// Report the runs in a JSON color matrix (`[["red", null, ...], ...]`)
pub fn check(input: &str) -> Result<Value> {
    let matrix: ColorMatrix = serde_json::from_str(input).context("check: invalid color matrix")?;
    if !matrix.is_rectangular() {
        return Err(anyhow!("check: rows have different lengths"));
    }

    let mut grid = BattleGrid::new(matrix.rows(), matrix.cols());
    grid.apply_color_matrix(&matrix, &mut SequentialIds::with_epoch(0));
    let report = mark_matched_blocks(&mut grid);
    info!(
        "checked {}x{} matrix: {} matched cells",
        matrix.rows(),
        matrix.cols(),
        report.cells.len()
    );

    let cells: Vec<[usize; 2]> = report.cells.iter().map(|&(r, c)| [r, c]).collect();
    Ok(json!({
        "matches": report.matches,
        "cells": cells,
    }))
}

pub fn read_stdin() -> Result<String> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("check: failed to read stdin")?;
    Ok(input)
}
