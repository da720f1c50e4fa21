pub mod content;
pub mod my_list;
pub mod playback;
pub mod profiles;
pub mod watch_history;
