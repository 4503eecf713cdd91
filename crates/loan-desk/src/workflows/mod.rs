pub mod leads;
pub mod pricing;
pub mod quoting;
