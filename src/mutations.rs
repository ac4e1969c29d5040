//! Wild-type residue maps and mutation token normalisation.
//!
//! Mutation tokens come in two flavours: chain-qualified (`A24R`, chain A,
//! position 24, mutant Arg) as produced by structure naming, and
//! wild-type-qualified (`Q24R`). Tokens are rewritten into the latter using a
//! map of the wild-type residue at each position.

use crate::error::{Error, Result};
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

static MUTATION_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z])(\d+)([A-Za-z])$").unwrap());

/// Wild-type one-letter code per residue position of a chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResidueMap {
    residues: HashMap<u32, char>,
}

impl ResidueMap {
    /// Parse `position,code` lines.
    ///
    /// Blank lines, lines without exactly two fields and lines with a
    /// non-integer position are ignored. Codes are uppercased. When a
    /// position appears more than once the last line wins.
    pub fn parse(text: &str) -> Self {
        let mut residues = HashMap::new();
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let parts: Vec<&str> = line.split(',').map(str::trim).collect();
            if parts.len() != 2 {
                continue;
            }
            let Ok(pos) = parts[0].parse::<u32>() else {
                continue;
            };
            let Some(aa) = parts[1].chars().next().map(|c| c.to_ascii_uppercase()) else {
                continue;
            };
            if let Some(previous) = residues.insert(pos, aa) {
                debug!("Residue {pos} listed twice, replacing {previous} with {aa}");
            }
        }
        Self { residues }
    }

    /// Load a residue map file. An empty or unusable map is an error.
    pub fn from_file(path: &Path) -> Result<Self> {
        let map = Self::parse(&std::fs::read_to_string(path)?);
        if map.is_empty() {
            return Err(Error::EmptyResidueMap(path.to_path_buf()));
        }
        debug!("Loaded {} wild-type residues from {}", map.len(), path.display());
        Ok(map)
    }

    /// Wild-type code at `pos`.
    pub fn get(&self, pos: u32) -> Option<char> {
        self.residues.get(&pos).copied()
    }

    /// Number of positions in the map.
    pub fn len(&self) -> usize {
        self.residues.len()
    }

    /// Whether the map has no positions.
    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }
}

impl FromIterator<(u32, char)> for ResidueMap {
    fn from_iter<I: IntoIterator<Item = (u32, char)>>(iter: I) -> Self {
        Self {
            residues: iter.into_iter().collect(),
        }
    }
}

/// Rewrite a chain-qualified mutation token into a wild-type-qualified one.
///
/// `A24R` becomes `Q24R` when position 24 is a glutamine. Tokens of another
/// shape, or whose position is not in the map, are returned unchanged.
///
/// # Example
///
/// ```
/// use plipscan::{normalize_mutation, ResidueMap};
///
/// let wt = ResidueMap::parse("24,Q\n");
/// assert_eq!(normalize_mutation("A24R", &wt), "Q24R");
/// assert_eq!(normalize_mutation("Z99Q", &wt), "Z99Q");
/// ```
pub fn normalize_mutation(token: &str, wt: &ResidueMap) -> String {
    let Some(caps) = MUTATION_TOKEN.captures(token) else {
        return token.to_string();
    };
    let Ok(pos) = caps[2].parse::<u32>() else {
        return token.to_string();
    };
    match wt.get(pos) {
        Some(wt_aa) => format!("{wt_aa}{pos}{}", caps[3].to_ascii_uppercase()),
        None => token.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_residue_map() {
        let map = ResidueMap::parse("24,Q\n\n 30 , k \nbad line\nx,Y\n31,A,B\n24,E\n");
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(30), Some('K'));
        // Later lines overwrite earlier ones
        assert_eq!(map.get(24), Some('E'));
        assert_eq!(map.get(31), None);
    }

    #[test]
    fn test_empty_residue_map_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("residues.txt");
        std::fs::write(&path, "position,aa\n\n").unwrap();
        assert!(matches!(
            ResidueMap::from_file(&path),
            Err(Error::EmptyResidueMap(_))
        ));

        std::fs::write(&path, "24,Q\n").unwrap();
        assert_eq!(ResidueMap::from_file(&path).unwrap().get(24), Some('Q'));
    }

    #[test]
    fn test_normalize_mutation() {
        let wt: ResidueMap = [(24, 'Q'), (31, 'K')].into_iter().collect();
        assert_eq!(normalize_mutation("A24R", &wt), "Q24R");
        assert_eq!(normalize_mutation("a31e", &wt), "K31E");
        assert_eq!(normalize_mutation("Z99Q", &wt), "Z99Q");
    }

    #[test]
    fn test_normalize_passes_other_shapes() {
        let wt: ResidueMap = [(24, 'Q')].into_iter().collect();
        for token in ["6M0J", "AA24R", "A24", "24R", "A24RR", "A2 4R", ""] {
            assert_eq!(normalize_mutation(token, &wt), token);
        }
    }
}
