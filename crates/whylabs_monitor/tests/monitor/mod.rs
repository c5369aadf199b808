mod helpers;
mod manager;
mod presets;
mod setup;
