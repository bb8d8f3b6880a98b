pub mod formatter;

pub use formatter::{
    format_breakdown, format_interval, format_room_table, format_score, format_score_result,
    format_tsv, should_use_colors,
};
