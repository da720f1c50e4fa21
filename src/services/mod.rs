//! Request-level operations. Each takes the stores it needs plus the
//! authenticated caller, validates first and only then reads or writes.

pub mod content;
pub mod discovery;
pub mod my_list;
pub mod playback;
pub mod profiles;
pub mod progress;
