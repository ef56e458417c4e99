pub mod conditions;
pub mod policy;
