/// Marker shown instead of a hole number once a team has played every hole.
pub const FINISHED_MARKER: &str = "F";
/// Marker used for an even (zero) score.
pub const EVEN_MARKER: &str = "E";

/// Render a total with an explicit sign: `+3`, `E`, `-2`.
pub fn format_score(total: i64) -> String {
    match total {
        0 => EVEN_MARKER.to_string(),
        positive if positive > 0 => format!("+{positive}"),
        negative => negative.to_string(),
    }
}

/// Render the holes-through column, switching to [`FINISHED_MARKER`] on the last hole.
pub fn format_through(through: u8, holes: u8) -> String {
    if holes > 0 && through >= holes {
        FINISHED_MARKER.to_string()
    } else {
        through.to_string()
    }
}
