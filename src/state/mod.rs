//! Form session state module

mod availability;
mod forms;
mod step;

pub use availability::*;
pub use forms::*;
pub use step::*;
