//! Parsing and generating input for runs
//!
//! Text formats accepted on the command line:
//!
//! - values: `5,3,8,1`
//! - matrix: `1,2,3;4,5,6` (rows separated by `;`)
//! - edges: `0-1:4,1-2:3` (`u-v:weight`)

use crate::errors::ValidationError;
use crate::trace::mst::Edge;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Reproducible random values in `1..=max_value`
pub fn random_values(len: usize, max_value: i64, seed: u64) -> Vec<i64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(1..=max_value.max(1))).collect()
}

fn parse_number(field: &'static str, text: &str) -> Result<i64, ValidationError> {
    text.trim()
        .parse()
        .map_err(|_| ValidationError::InvalidValue {
            field,
            message: format!("'{}' is not an integer", text.trim()),
        })
}

pub fn parse_index(field: &'static str, text: &str) -> Result<usize, ValidationError> {
    text.trim()
        .parse()
        .map_err(|_| ValidationError::InvalidValue {
            field,
            message: format!("'{}' is not a non-negative index", text.trim()),
        })
}

/// Comma-separated integers; an empty string is an empty list
pub fn parse_values(text: &str) -> Result<Vec<i64>, ValidationError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    text.split(',')
        .map(|part| parse_number("values", part))
        .collect()
}

/// Rows separated by `;`, cells by `,`. Shape is checked by the generator.
pub fn parse_matrix(text: &str) -> Result<Vec<Vec<i64>>, ValidationError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    text.split(';')
        .map(|row| {
            row.split(',')
                .map(|cell| parse_number("matrix", cell))
                .collect()
        })
        .collect()
}

/// `u-v:weight` entries separated by `,`
pub fn parse_edges(text: &str) -> Result<Vec<Edge>, ValidationError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    text.split(',')
        .map(|entry| {
            let malformed = || ValidationError::InvalidValue {
                field: "edges",
                message: format!("'{}' should look like u-v:weight", entry.trim()),
            };
            let (ends, weight) = entry.split_once(':').ok_or_else(malformed)?;
            let (u, v) = ends.split_once('-').ok_or_else(malformed)?;
            Ok((
                parse_index("edges", u)?,
                parse_index("edges", v)?,
                parse_number("edges", weight)?,
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_values_reproducible() {
        let a = random_values(10, 50, 7);
        assert_eq!(a, random_values(10, 50, 7));
        assert!(a.iter().all(|&v| (1..=50).contains(&v)));
    }

    #[test]
    fn test_parse_values() {
        assert_eq!(parse_values("5, 3,8,-1").unwrap(), vec![5, 3, 8, -1]);
        assert_eq!(parse_values("").unwrap(), Vec::<i64>::new());
        assert!(matches!(
            parse_values("1,x"),
            Err(ValidationError::InvalidValue { field: "values", .. })
        ));
    }

    #[test]
    fn test_parse_matrix_keeps_ragged_rows() {
        let m = parse_matrix("1,2,3;4,5").unwrap();
        assert_eq!(m, vec![vec![1, 2, 3], vec![4, 5]]);
    }

    #[test]
    fn test_parse_edges() {
        assert_eq!(parse_edges("0-1:4, 1-2:-3").unwrap(), vec![(0, 1, 4), (1, 2, -3)]);
        assert!(parse_edges("0:1").is_err());
    }
}
