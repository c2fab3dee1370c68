// crates/planboard-client/src/components/mod.rs

mod board;
mod chat;
mod demand_list;
mod help;
mod notice;
mod picker;
mod status_bar;

pub use board::draw_board;
pub use chat::draw_chat;
pub use demand_list::draw_demand_list;
pub use help::draw_help;
pub use notice::draw_notice;
pub use picker::draw_picker;
pub use status_bar::draw_status_bar;
