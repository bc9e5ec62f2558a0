//! Command-line parsing
//!
//! ```text
//! algoreplay trace matrix <row|column|snake|spiral|diagonal> <matrix>
//! algoreplay trace prefix <values> [<left> <right>]
//! algoreplay trace kadane <values>
//! algoreplay trace segtree build <values>
//! algoreplay trace segtree query <values> <left> <right>
//! algoreplay trace segtree update <values> <index> <value>
//! algoreplay trace mst <vertices> <edges>
//! algoreplay trace trie <insert|search> <key> [<word>...]
//! algoreplay sort <algorithm> [<values> | --size <n>]
//! algoreplay race <algorithm> <algorithm> [<algorithm>...] [--values <values>] [--size <n>]
//! ```

use crate::config::InputConfig;
use crate::errors::ValidationError;
use crate::exec::SortAlgorithm;
use crate::input::{parse_edges, parse_index, parse_matrix, parse_values, random_values};
use crate::trace::{
    Generator, Kadane, Kruskal, MatrixOrder, MatrixTraversal, PrefixSum, SegmentOp,
    SegmentTreeTrace, TrieOp, TrieTrace,
};

pub const USAGE: &str = "\
Usage:
  algoreplay trace matrix <row|column|snake|spiral|diagonal> <matrix>
  algoreplay trace prefix <values> [<left> <right>]
  algoreplay trace kadane <values>
  algoreplay trace segtree <build|query|update> <values> [<a> <b>]
  algoreplay trace mst <vertices> <edges>
  algoreplay trace trie <insert|search> <key> [<word>...]
  algoreplay sort <algorithm> [<values> | --size <n>]
  algoreplay race <algorithm> <algorithm> [...] [--values <values>] [--size <n>]

Formats: values 5,3,8,1   matrix 1,2,3;4,5,6   edges 0-1:4,1-2:3
Algorithms: bubble selection insertion quick merge heap";

/// What the binary was asked to do
pub enum Command {
    Trace(Box<dyn Generator>),
    Sort {
        algorithm: SortAlgorithm,
        values: Vec<i64>,
    },
    Race {
        algorithms: Vec<SortAlgorithm>,
        values: Vec<i64>,
    },
}

fn arg<'a>(args: &'a [String], index: usize, field: &'static str) -> Result<&'a str, ValidationError> {
    args.get(index)
        .map(|s| s.as_str())
        .ok_or_else(|| ValidationError::InvalidValue {
            field,
            message: "missing argument".to_string(),
        })
}

/// Parse arguments after the program name
pub fn parse_args(args: &[String], input: &InputConfig) -> Result<Command, ValidationError> {
    match arg(args, 0, "command")? {
        "trace" => parse_trace(&args[1..]).map(Command::Trace),
        "sort" => {
            let algorithm = SortAlgorithm::parse(arg(args, 1, "algorithm")?)?;
            let values = match args.get(2).map(|s| s.as_str()) {
                Some("--size") => {
                    let size = parse_index("size", arg(args, 3, "size")?)?;
                    random_values(size, input.max_value, input.seed)
                }
                Some(text) => parse_values(text)?,
                None => random_values(input.size, input.max_value, input.seed),
            };
            Ok(Command::Sort { algorithm, values })
        }
        "race" => parse_race(&args[1..], input),
        other => Err(ValidationError::UnknownName {
            field: "command",
            name: other.to_string(),
        }),
    }
}

fn parse_trace(args: &[String]) -> Result<Box<dyn Generator>, ValidationError> {
    let generator: Box<dyn Generator> = match arg(args, 0, "generator")? {
        "matrix" => {
            let order = MatrixOrder::parse(arg(args, 1, "matrix.order")?)?;
            let matrix = parse_matrix(arg(args, 2, "matrix")?)?;
            Box::new(MatrixTraversal::new(matrix, order))
        }
        "prefix" => {
            let trace = PrefixSum::new(parse_values(arg(args, 1, "values")?)?);
            match (args.get(2), args.get(3)) {
                (Some(l), Some(r)) => Box::new(
                    trace.with_query(parse_index("query.left", l)?, parse_index("query.right", r)?),
                ),
                _ => Box::new(trace),
            }
        }
        "kadane" => Box::new(Kadane::new(parse_values(arg(args, 1, "values")?)?)),
        "segtree" => {
            let op_name = arg(args, 1, "segtree.op")?;
            let values = parse_values(arg(args, 2, "values")?)?;
            let op = match op_name {
                "build" => SegmentOp::Build,
                "query" => SegmentOp::Query {
                    left: parse_index("query.left", arg(args, 3, "query.left")?)?,
                    right: parse_index("query.right", arg(args, 4, "query.right")?)?,
                },
                "update" => SegmentOp::Update {
                    index: parse_index("update.index", arg(args, 3, "update.index")?)?,
                    value: parse_values(arg(args, 4, "update.value")?)?
                        .first()
                        .copied()
                        .ok_or_else(|| ValidationError::InvalidValue {
                            field: "update.value",
                            message: "missing value".to_string(),
                        })?,
                },
                other => {
                    return Err(ValidationError::UnknownName {
                        field: "segtree.op",
                        name: other.to_string(),
                    })
                }
            };
            Box::new(SegmentTreeTrace::new(values, op))
        }
        "mst" => {
            let vertices = parse_index("vertices", arg(args, 1, "vertices")?)?;
            let edges = parse_edges(arg(args, 2, "edges")?)?;
            Box::new(Kruskal::new(vertices, edges))
        }
        "trie" => {
            let key = arg(args, 2, "trie.key")?.to_string();
            let op = match arg(args, 1, "trie.op")? {
                "insert" => TrieOp::Insert(key),
                "search" => TrieOp::Search(key),
                other => {
                    return Err(ValidationError::UnknownName {
                        field: "trie.op",
                        name: other.to_string(),
                    })
                }
            };
            let words = args.iter().skip(3).cloned().collect();
            Box::new(TrieTrace::new(words, op))
        }
        other => {
            return Err(ValidationError::UnknownName {
                field: "generator",
                name: other.to_string(),
            })
        }
    };
    Ok(generator)
}

fn parse_race(args: &[String], input: &InputConfig) -> Result<Command, ValidationError> {
    let mut algorithms = Vec::new();
    let mut values = None;
    let mut size = input.size;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--values" => {
                values = Some(parse_values(arg(args, i + 1, "values")?)?);
                i += 2;
            }
            "--size" => {
                size = parse_index("size", arg(args, i + 1, "size")?)?;
                i += 2;
            }
            name => {
                algorithms.push(SortAlgorithm::parse(name)?);
                i += 1;
            }
        }
    }

    let values = values.unwrap_or_else(|| random_values(size, input.max_value, input.seed));
    Ok(Command::Race { algorithms, values })
}
