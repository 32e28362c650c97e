pub(crate) mod clip;
pub(crate) mod kernels;
pub(crate) mod ops;
