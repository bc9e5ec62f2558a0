//! Trie insert and search

use super::Generator;
use crate::errors::{TraceResult, ValidationError};
use crate::snapshot::{
    Element, ElementStatus, EventKind, Narrative, StepSequence, TraceRecorder, empty_sequence,
};

const ALPHABET: usize = 26;

#[derive(Debug, Clone, Default)]
struct TrieNode {
    children: [Option<usize>; ALPHABET],
    terminal: bool,
}

/// Arena-backed prefix tree over lowercase ASCII words
#[derive(Debug, Clone)]
pub struct Trie {
    nodes: Vec<TrieNode>,
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl Trie {
    pub fn new() -> Self {
        Trie {
            nodes: vec![TrieNode::default()],
        }
    }

    pub fn insert(&mut self, word: &str) {
        let mut node = 0;
        for slot in word.bytes().map(|b| (b - b'a') as usize) {
            node = self.child_or_create(node, slot).0;
        }
        self.nodes[node].terminal = true;
    }

    pub fn contains(&self, word: &str) -> bool {
        let mut node = 0;
        for slot in word.bytes().map(|b| (b - b'a') as usize) {
            match self.nodes[node].children[slot] {
                Some(next) => node = next,
                None => return false,
            }
        }
        self.nodes[node].terminal
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the child and whether it was created
    fn child_or_create(&mut self, node: usize, slot: usize) -> (usize, bool) {
        if let Some(next) = self.nodes[node].children[slot] {
            return (next, false);
        }
        let next = self.nodes.len();
        self.nodes.push(TrieNode::default());
        self.nodes[node].children[slot] = Some(next);
        (next, true)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrieOp {
    Insert(String),
    Search(String),
}

/// Build a trie from `words` silently, then trace `op`
#[derive(Debug, Clone)]
pub struct TrieTrace {
    pub words: Vec<String>,
    pub op: TrieOp,
}

impl TrieTrace {
    pub fn new(words: Vec<String>, op: TrieOp) -> Self {
        TrieTrace { words, op }
    }

    fn key(&self) -> &str {
        match &self.op {
            TrieOp::Insert(key) | TrieOp::Search(key) => key,
        }
    }

    fn validate(&self) -> TraceResult<()> {
        let check = |field: &'static str, word: &str| {
            if word.bytes().all(|b| b.is_ascii_lowercase()) {
                Ok(())
            } else {
                Err(ValidationError::InvalidValue {
                    field,
                    message: format!("'{}' must contain only lowercase letters a-z", word),
                })
            }
        };
        for word in &self.words {
            check("trie.words", word)?;
        }
        check("trie.key", self.key())
    }
}

impl Generator for TrieTrace {
    fn name(&self) -> &str {
        "trie"
    }

    fn generate(&self) -> TraceResult<StepSequence> {
        self.validate()?;
        let key = self.key();
        if key.is_empty() {
            return Ok(empty_sequence("key"));
        }

        let mut trie = Trie::new();
        for word in &self.words {
            trie.insert(word);
        }

        let chars: Vec<Element> = key.bytes().map(|b| Element::new(b as i64)).collect();
        let mut rec = TraceRecorder::new(chars);
        let verb = match self.op {
            TrieOp::Insert(_) => "Insert",
            TrieOp::Search(_) => "Search",
        };
        rec.emit(
            EventKind::Start,
            Vec::new(),
            Narrative::new(
                "Start",
                format!("{} '{}' into a trie of {} words.", verb, key, self.words.len()),
            )
            .var("nodes", trie.node_count()),
        );

        let mut node = 0;
        match self.op {
            TrieOp::Insert(_) => {
                let mut created = 0usize;
                for (i, b) in key.bytes().enumerate() {
                    let ch = b as char;
                    let (next, is_new) = trie.child_or_create(node, (b - b'a') as usize);
                    node = next;
                    if is_new {
                        created += 1;
                        rec.mark(i, ElementStatus::Modified);
                        rec.emit(
                            EventKind::Update,
                            vec![i],
                            Narrative::new(
                                format!("Create '{}'", ch),
                                format!("No child for '{}', add a new node.", ch),
                            )
                            .var("depth", i + 1)
                            .var("created", created),
                        );
                    } else {
                        rec.mark(i, ElementStatus::Visiting);
                        rec.emit(
                            EventKind::Visit,
                            vec![i],
                            Narrative::new(
                                format!("Follow '{}'", ch),
                                format!("Child for '{}' already exists.", ch),
                            )
                            .var("depth", i + 1)
                            .var("created", created),
                        );
                    }
                }
                let already = trie.nodes[node].terminal;
                trie.nodes[node].terminal = true;
                let explanation = if already {
                    format!("'{}' was already stored.", key)
                } else {
                    format!("Mark the end of '{}'.", key)
                };
                rec.emit(
                    EventKind::Done,
                    Vec::new(),
                    Narrative::new("Done", explanation)
                        .var("created", created)
                        .var("nodes", trie.node_count()),
                );
            }
            TrieOp::Search(_) => {
                for (i, b) in key.bytes().enumerate() {
                    let ch = b as char;
                    match trie.nodes[node].children[(b - b'a') as usize] {
                        Some(next) => {
                            node = next;
                            rec.mark(i, ElementStatus::Visiting);
                            rec.emit(
                                EventKind::Visit,
                                vec![i],
                                Narrative::new(
                                    format!("Follow '{}'", ch),
                                    format!("'{}' matches at depth {}.", ch, i + 1),
                                )
                                .var("depth", i + 1),
                            );
                        }
                        None => {
                            rec.mark_range(i..=key.len() - 1, ElementStatus::NotFound);
                            rec.emit(
                                EventKind::Reject,
                                (i..key.len()).collect(),
                                Narrative::new(
                                    format!("Missing '{}'", ch),
                                    format!("No child for '{}' at depth {}.", ch, i + 1),
                                )
                                .var("found", false),
                            );
                            rec.emit(
                                EventKind::Done,
                                Vec::new(),
                                Narrative::new("Done", format!("'{}' is not stored.", key))
                                    .var("found", false),
                            );
                            return Ok(rec.finish());
                        }
                    }
                }

                let found = trie.nodes[node].terminal;
                if found {
                    rec.mark_all(ElementStatus::Found);
                    rec.emit(
                        EventKind::Accept,
                        (0..key.len()).collect(),
                        Narrative::new("Found", format!("'{}' ends at a word node.", key))
                            .var("found", true),
                    );
                } else {
                    rec.mark_all(ElementStatus::NotFound);
                    rec.emit(
                        EventKind::Reject,
                        (0..key.len()).collect(),
                        Narrative::new(
                            "Prefix only",
                            format!("'{}' is a prefix of a stored word, not a word.", key),
                        )
                        .var("found", false),
                    );
                }
                rec.emit(
                    EventKind::Done,
                    Vec::new(),
                    Narrative::new("Done", format!("Search for '{}' finished.", key))
                        .var("found", found),
                );
            }
        }

        Ok(rec.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_trie_contains() {
        let mut trie = Trie::new();
        trie.insert("car");
        trie.insert("cart");
        assert!(trie.contains("car"));
        assert!(!trie.contains("ca"));
        assert!(!trie.contains("cat"));
        assert_eq!(trie.node_count(), 5);
    }

    #[test]
    fn test_insert_marks_shared_prefix() {
        let seq = TrieTrace::new(words(&["car"]), TrieOp::Insert("cat".into()))
            .generate()
            .unwrap();
        let statuses = seq.last().statuses();
        assert_eq!(
            statuses,
            vec![
                ElementStatus::Visiting,
                ElementStatus::Visiting,
                ElementStatus::Modified
            ]
        );
        assert_eq!(seq.last().variable("created"), Some("1"));
    }

    #[test]
    fn test_search_miss_marks_tail() {
        let seq = TrieTrace::new(words(&["dog"]), TrieOp::Search("dig".into()))
            .generate()
            .unwrap();
        assert_eq!(seq.last().variable("found"), Some("false"));
        assert_eq!(seq.last().count(ElementStatus::NotFound), 2);
    }

    #[test]
    fn test_search_hit() {
        let seq = TrieTrace::new(words(&["dog", "do"]), TrieOp::Search("do".into()))
            .generate()
            .unwrap();
        assert_eq!(seq.last().variable("found"), Some("true"));
        assert_eq!(seq.last().count(ElementStatus::Found), 2);
    }

    #[test]
    fn test_uppercase_rejected() {
        let err = TrieTrace::new(Vec::new(), TrieOp::Search("Dog".into())).generate();
        assert!(matches!(
            err,
            Err(ValidationError::InvalidValue { field: "trie.key", .. })
        ));
    }
}
