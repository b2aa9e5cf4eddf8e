//! Column-wide token statistics.
//!
//! Collects, for every token position, the widest token and the largest
//! numeric value seen anywhere in the column. Time tokens are not visited.

use crate::error::{ExcellaintError, Result};
use crate::models::{ColumnTokenStats, PositionStats, TokenizedColumn};
use tracing::debug;

/// Reduce a tokenized column to per-position statistics.
///
/// Null rows are skipped; a column with no non-null rows yields empty
/// statistics.
pub fn collect_statistics(column: &TokenizedColumn) -> Result<ColumnTokenStats> {
    let mut positions: Vec<PositionStats> = Vec::new();

    for (row, tokens) in column.rows.iter().enumerate() {
        let Some(tokens) = tokens else {
            continue;
        };

        for (position, token) in tokens.date.iter().enumerate() {
            let value = token
                .parse::<u64>()
                .map_err(|_| ExcellaintError::NonNumericToken {
                    row,
                    position,
                    token: token.clone(),
                })?;
            let chars = token.chars().count();

            match positions.get_mut(position) {
                Some(stats) => {
                    stats.max_chars = stats.max_chars.max(chars);
                    stats.max_value = stats.max_value.max(value);
                }
                None => positions.push(PositionStats {
                    max_chars: chars,
                    max_value: value,
                }),
            }
        }
    }

    let stats = ColumnTokenStats { positions };
    debug!("Column token statistics: {:?}", stats.positions);
    Ok(stats)
}
