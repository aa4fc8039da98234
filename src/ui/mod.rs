pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{banner, code_line, dim, error, header, info, section, session_line, success, warn};
pub use table::{codes_table, sessions_table, stats_table};
pub use theme::{theme, Theme};
