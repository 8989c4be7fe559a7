//! Process-level I/O: Unix signals feeding the watch loop.

pub mod signals;
