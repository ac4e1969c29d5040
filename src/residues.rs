use crate::error::{Error, Result};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// The 20 standard amino acids as three-letter codes, in alphabetical order.
pub const AMINO_ACIDS: [&str; 20] = [
    "ALA", "ARG", "ASN", "ASP", "CYS", "GLN", "GLU", "GLY", "HIS", "ILE", "LEU", "LYS", "MET",
    "PHE", "PRO", "SER", "THR", "TRP", "TYR", "VAL",
];

/// Placeholder label for an interaction partner missing any identifying field.
pub const MISSING_LABEL: &str = "NA";

/// The one-letter code of a standard three-letter residue code, or `None`.
fn one_letter(aa_three: &str) -> Option<char> {
    let aa_code = match aa_three {
        "ALA" => 'A',
        "ARG" => 'R',
        "ASN" => 'N',
        "ASP" => 'D',
        "CYS" => 'C',
        "GLN" => 'Q',
        "GLU" => 'E',
        "GLY" => 'G',
        "HIS" => 'H',
        "ILE" => 'I',
        "LEU" => 'L',
        "LYS" => 'K',
        "MET" => 'M',
        "PHE" => 'F',
        "PRO" => 'P',
        "SER" => 'S',
        "THR" => 'T',
        "TRP" => 'W',
        "TYR" => 'Y',
        "VAL" => 'V',
        _ => return None,
    };
    Some(aa_code)
}

/// Translate a three-letter residue code into its one-letter code.
///
/// Only the 20 standard amino acids are recognised; anything else is an
/// [`Error::UnknownResidue`].
///
/// # Example
///
/// ```
/// use plipscan::three_to_one;
///
/// assert_eq!(three_to_one("GLN").unwrap(), 'Q');
/// assert!(three_to_one("HOH").is_err());
/// ```
pub fn three_to_one(aa_three: &str) -> Result<char> {
    one_letter(aa_three).ok_or_else(|| Error::UnknownResidue(aa_three.to_string()))
}

/// Translate an ordered run of three-letter codes into a one-letter sequence.
///
/// Fails on the first unrecognised code.
pub fn three_to_one_seq(codes: &[&str]) -> Result<String> {
    codes.iter().map(|code| three_to_one(code)).collect()
}

/// Lenient lookup used when reading labels back from tables. Covers the
/// protonation and modified-residue names force fields emit, and maps
/// everything else to `X`.
fn one_letter_or_unknown(aa_three: &str) -> char {
    let aa_three = aa_three.to_uppercase();
    match aa_three.as_str() {
        "HIE" | "HID" | "HIP" => 'H',
        "CYX" => 'C',
        "MSE" => 'M',
        other => one_letter(other).unwrap_or('X'),
    }
}

/// Synthesise the label of an interaction partner from its raw report fields.
///
/// The label is the one-letter code, chain and residue number concatenated
/// (`GLN`, `A`, `24` becomes `QA24`). A residue type that is present is
/// always translated, so an unknown code is an error even when the partner
/// is incomplete. If any field is absent or empty [`MISSING_LABEL`] is
/// returned instead.
pub fn residue_label(
    restype: Option<&str>,
    reschain: Option<&str>,
    resnr: Option<&str>,
) -> Result<String> {
    fn present(field: Option<&str>) -> Option<&str> {
        field.filter(|f| !f.is_empty())
    }
    let aa = present(restype).map(three_to_one).transpose()?;
    match (aa, present(reschain), present(resnr)) {
        (Some(aa), Some(chain), Some(resnr)) => Ok(format!("{aa}{chain}{resnr}")),
        _ => Ok(MISSING_LABEL.to_string()),
    }
}

static ONE_LETTER_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z])([A-Za-z])(\d+)$").unwrap());
static THREE_LETTER_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]{3})([A-Za-z])(\d+)$").unwrap());
static CHAIN_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z])\s*[:_\-]?\s*(\d+)").unwrap());
static LEADING_ONE_LETTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z])\s*[:_\-]?\s*[A-Za-z]\s*[:_\-]?\s*\d+").unwrap()
});
static THREE_LETTER_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z]{3})").unwrap());

/// A residue identified by chain, number and one-letter code.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ResidueLabel {
    /// Chain identifier
    pub chain: char,
    /// Residue number
    pub resnum: u32,
    /// One-letter amino acid code, `X` when unknown
    pub aa: char,
}

impl ResidueLabel {
    /// Recover a residue from a label written by the extractor (`QA24`) or by
    /// other tools (`GLNA24`, `Q:A:24`, `A-24 GLN`, ...).
    ///
    /// Returns `None` for labels with no chain/number pair, including the
    /// [`MISSING_LABEL`] placeholder.
    pub fn parse(label: &str) -> Option<Self> {
        let s = label.trim();

        if let Some(caps) = ONE_LETTER_LABEL.captures(s) {
            return Some(Self {
                chain: upper_char(&caps[2]),
                resnum: caps[3].parse().ok()?,
                aa: upper_char(&caps[1]),
            });
        }

        if let Some(caps) = THREE_LETTER_LABEL.captures(s) {
            return Some(Self {
                chain: upper_char(&caps[2]),
                resnum: caps[3].parse().ok()?,
                aa: one_letter_or_unknown(&caps[1]),
            });
        }

        let caps = CHAIN_NUMBER.captures(s)?;
        let chain = upper_char(&caps[1]);
        let resnum = caps[2].parse().ok()?;
        let aa = if let Some(aa1) = LEADING_ONE_LETTER.captures(s) {
            upper_char(&aa1[1])
        } else if let Some(aa3) = THREE_LETTER_RUN.captures(s) {
            one_letter_or_unknown(&aa3[1])
        } else {
            'X'
        };
        Some(Self { chain, resnum, aa })
    }
}

impl fmt::Display for ResidueLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.aa, self.chain, self.resnum)
    }
}

fn upper_char(s: &str) -> char {
    s.chars()
        .next()
        .map(|c| c.to_ascii_uppercase())
        .unwrap_or('X')
}
