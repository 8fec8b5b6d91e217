pub mod domain;
pub mod population;
pub mod spatial;
