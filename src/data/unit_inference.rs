/// Guess a display unit from a column name.
pub fn infer_unit(column_name: &str) -> String {
    let lower = column_name.to_lowercase();

    if lower.contains("date") || lower.contains("year") || lower.contains("time") {
        "yr".to_string()
    } else if lower.contains("co2") || lower.contains("average") || lower.contains("trend")
        || lower.contains("ppm") || lower.contains("interpolated") {
        "ppm".to_string()
    } else if lower.contains("ch4") || lower.contains("n2o") || lower.contains("ppb") {
        "ppb".to_string()
    } else if lower.contains("temp") || lower.contains("anomaly") {
        "\u{00B0}C".to_string()
    } else {
        "units".to_string()
    }
}
