mod algorithm;
mod hyperparams;
mod iter;
mod regression;

pub use algorithm::*;
pub use hyperparams::*;
pub use iter::*;
pub use regression::*;
