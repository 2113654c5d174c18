pub(crate) mod point;
pub(crate) mod region;
