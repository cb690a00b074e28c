//! Les deux engins : dyzurs (on-call) puis horaires journaliers (timetable).

pub mod oncall;
pub mod timetable;

pub use oncall::{OnCallEngine, OnCallResult};
pub use timetable::{Timetable, TimetableEngine};
