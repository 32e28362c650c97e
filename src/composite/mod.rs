pub(crate) mod combine;
pub(crate) mod mode;
