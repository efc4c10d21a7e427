#![forbid(unsafe_code)]

mod counters;

pub(in crate::store) use counters::{counter_value_tx, next_counter_tx};
