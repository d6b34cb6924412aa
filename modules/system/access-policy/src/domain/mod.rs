pub mod decision;
pub mod policy;
