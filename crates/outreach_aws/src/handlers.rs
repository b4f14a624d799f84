pub mod enrichment;
pub mod intake;
