mod browse;
mod info;
mod list;
mod reload;

pub use browse::cmd_browse;
pub use info::{cmd_anime_info, cmd_sheet_info};
pub use list::{cmd_list_anime, cmd_list_sheet};
pub use reload::cmd_reload;
