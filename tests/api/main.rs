mod content;
mod discovery;
mod health_check;
mod helpers;
mod playback;
mod profiles;
mod progress;
