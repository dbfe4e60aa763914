//! Statistical building blocks shared by the research-side modules: ordinary least squares,
//! seeded return simulation, and autocorrelation diagnostics.

pub mod acf;
pub mod ols;
pub mod sim;
