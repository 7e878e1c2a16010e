use roadnet_core::NodeId;

/// Render a travel time the way results are displayed: two decimals.
pub fn format_distance(distance: f64) -> String {
    format!("{distance:.2}")
}

/// Space-separated node indices, source first.
pub fn format_path(path: &[NodeId]) -> String {
    path.iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(15.0), "15.00");
        assert_eq!(format_distance(2.0 / 3.0), "0.67");
        assert_eq!(format_distance(0.0), "0.00");
    }

    #[test]
    fn test_format_path() {
        assert_eq!(format_path(&[0, 1, 2]), "0 1 2");
        assert_eq!(format_path(&[7]), "7");
        assert_eq!(format_path(&[]), "");
    }
}
