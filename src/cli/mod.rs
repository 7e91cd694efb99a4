pub mod config_cmd;
pub mod output;
pub mod pace_cmd;
pub mod renderer;
pub mod wait_cmd;
