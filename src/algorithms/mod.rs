pub mod common;
pub mod priority_queue;
pub mod reference;
pub mod weighted_a_star;
