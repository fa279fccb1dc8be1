//! Batch scheduling, parallel extraction, ordering and temporal smoothing.

pub(crate) mod assemble;
pub(crate) mod batch;
pub(crate) mod run;
pub(crate) mod smooth;
pub(crate) mod worker;
