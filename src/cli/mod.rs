pub(crate) mod ddg;
pub(crate) mod extract;
pub(crate) mod filter;
pub(crate) mod residues;
pub(crate) mod summary;
