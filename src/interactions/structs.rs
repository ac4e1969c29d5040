use core::fmt;

/// Categories of non-covalent contacts reported by PLIP.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Interaction {
    /// Contact between hydrophobic carbons
    Hydrophobic,
    /// Donor-hydrogen-acceptor bond
    HydrogenBond,
    /// Oppositely charged groups in close range
    SaltBridge,
    /// Stacked aromatic rings
    PiStack,
    /// Aromatic ring facing a cation
    PiCation,
    /// Halogen donor to acceptor bond
    HalogenBond,
    /// Coordination of a metal ion
    MetalComplex,
}

/// Geometric attributes an interaction may carry.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Attribute {
    /// Interaction distance in Å
    Distance,
    /// Interaction angle in degrees
    Angle,
    /// Lateral offset of stacked rings in Å
    Offset,
}

impl Attribute {
    /// Column name of the attribute in output tables.
    pub fn name(&self) -> &'static str {
        match self {
            Attribute::Distance => "distance",
            Attribute::Angle => "angle",
            Attribute::Offset => "offset",
        }
    }
}

/// Report fields an attribute is read from, first non-empty one wins.
pub type AttributeSchema = &'static [(Attribute, &'static [&'static str])];

impl Interaction {
    /// Every category, in report order.
    pub const ALL: [Interaction; 7] = [
        Interaction::Hydrophobic,
        Interaction::HydrogenBond,
        Interaction::SaltBridge,
        Interaction::PiStack,
        Interaction::PiCation,
        Interaction::HalogenBond,
        Interaction::MetalComplex,
    ];

    /// Categories counted in mutation summaries, in column order.
    /// Metal complexes are not part of protein-protein interfaces.
    pub const SUMMARIZED: [Interaction; 6] = [
        Interaction::HydrogenBond,
        Interaction::Hydrophobic,
        Interaction::SaltBridge,
        Interaction::PiStack,
        Interaction::PiCation,
        Interaction::HalogenBond,
    ];

    /// Section tag in the PLIP report, also used as the table name.
    pub fn tag(&self) -> &'static str {
        match self {
            Interaction::Hydrophobic => "hydrophobic_interactions",
            Interaction::HydrogenBond => "hydrogen_bonds",
            Interaction::SaltBridge => "salt_bridges",
            Interaction::PiStack => "pi_stacks",
            Interaction::PiCation => "pi_cation_interactions",
            Interaction::HalogenBond => "halogen_bonds",
            Interaction::MetalComplex => "metal_complexes",
        }
    }

    /// Attributes of the category and the report fields they come from.
    ///
    /// Field names differ between sections of a PLIP report; hydrogen bonds
    /// only expose the hydrogen-acceptor distance as `dist_h-a`, while most
    /// other sections use `dist`. New categories need their own entry here.
    pub fn schema(&self) -> AttributeSchema {
        use Attribute::*;
        match self {
            Interaction::HydrogenBond => &[(Distance, &["dist_h-a"]), (Angle, &["don_angle"])],
            Interaction::HalogenBond => &[
                (Distance, &["distance", "dist"]),
                (Angle, &["angle", "don_angle"]),
            ],
            Interaction::PiStack => &[
                (Distance, &["distance", "dist", "centdist"]),
                (Angle, &["angle"]),
                (Offset, &["offset"]),
            ],
            Interaction::Hydrophobic
            | Interaction::SaltBridge
            | Interaction::PiCation
            | Interaction::MetalComplex => &[(Distance, &["distance", "dist"])],
        }
    }

    /// Output table header: partner labels followed by the attributes.
    pub fn header(&self) -> Vec<&'static str> {
        let mut header = vec!["rec", "lig"];
        header.extend(self.schema().iter().map(|(attr, _)| attr.name()));
        header
    }
}

impl fmt::Display for Interaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// One contact between a receptor and a ligand residue.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionRecord {
    /// Category of the contact
    pub interaction: Interaction,
    /// Receptor residue label, e.g. `QA24`
    pub receptor: String,
    /// Ligand residue label
    pub ligand: String,
    /// Distance as written in the report
    pub distance: Option<String>,
    /// Angle as written in the report
    pub angle: Option<String>,
    /// Ring offset as written in the report
    pub offset: Option<String>,
}

impl InteractionRecord {
    /// Raw text of an attribute, if the report provided it.
    pub fn attribute(&self, attr: Attribute) -> Option<&str> {
        match attr {
            Attribute::Distance => self.distance.as_deref(),
            Attribute::Angle => self.angle.as_deref(),
            Attribute::Offset => self.offset.as_deref(),
        }
    }
}

impl fmt::Display for InteractionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Receptor [{receptor}] has {intxn:?} with Ligand [{ligand}]",
            receptor = self.receptor,
            intxn = self.interaction,
            ligand = self.ligand
        )
    }
}
