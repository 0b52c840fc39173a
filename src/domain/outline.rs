//! Outline format: the textual forest description

use itertools::Itertools;
use regex::Regex;

use crate::domain::error::{TreeError, TreeResult};

/// One branch declaration: a parent value and its ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchDecl {
    pub parent: i64,
    pub children: Vec<i64>,
}

/// Parsed forest description.
///
/// One declaration per line:
/// - `P: C1 C2 ...` declares branch `P` with children in that order
/// - `P:` declares a branch without children
/// - `V` declares a standalone leaf root
///
/// Blank lines and `#` comments are skipped. A child value that is
/// itself declared on the left of a line becomes a branch; any other
/// child value becomes a leaf.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForestOutline {
    /// Branch declarations in file order
    pub branches: Vec<BranchDecl>,
    /// Standalone leaf declarations in file order
    pub singles: Vec<i64>,
}

impl ForestOutline {
    /// Parse outline content.
    ///
    /// Rejects lines that are neither a declaration nor a bare value,
    /// and values declared on more than one line. A value may still
    /// appear any number of times as a child here; attachment rules
    /// are the builder's business.
    pub fn parse(content: &str) -> TreeResult<Self> {
        let decl_regex = Regex::new(r"^(-?\d+)\s*:\s*(.*)$").unwrap();

        let mut branches = Vec::new();
        let mut singles = Vec::new();

        for (number, raw) in content.lines().enumerate() {
            let line = number + 1;
            let trimmed = raw.trim();

            // Skip empty lines and comments
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if let Some(caps) = decl_regex.captures(trimmed) {
                let parent = parse_value(&caps[1], line)?;
                let mut children = Vec::new();
                for field in caps[2].split_whitespace() {
                    children.push(parse_value(field, line)?);
                }
                branches.push(BranchDecl { parent, children });
                continue;
            }

            match trimmed.parse::<i64>() {
                Ok(value) => singles.push(value),
                Err(_) => {
                    return Err(TreeError::InvalidOutline {
                        line,
                        message: format!(
                            "expected `parent: child ...` or a bare value, got {:?}",
                            trimmed
                        ),
                    });
                }
            }
        }

        let outline = Self { branches, singles };
        outline.check_duplicates()?;
        Ok(outline)
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty() && self.singles.is_empty()
    }

    /// Each value may be declared once, whether as a branch or as a
    /// standalone leaf.
    fn check_duplicates(&self) -> TreeResult<()> {
        let declared = self
            .branches
            .iter()
            .map(|decl| decl.parent)
            .chain(self.singles.iter().copied());
        if let Some(duplicate) = declared.duplicates().next() {
            return Err(TreeError::DuplicateDeclaration(duplicate));
        }
        Ok(())
    }
}

/// Parse a single value field, reporting the offending line on failure.
fn parse_value(field: &str, line: usize) -> TreeResult<i64> {
    field
        .parse::<i64>()
        .map_err(|e| TreeError::InvalidOutline {
            line,
            message: format!("bad value {:?}: {}", field, e),
        })
}
