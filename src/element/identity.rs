use crate::element::element_model::ElementData;

/// Whether two captured nodes describe the same underlying widget.
///
/// Providers sometimes hand back the node itself when asked for its parent.
/// Reference identity cannot catch that, so compare what the widget reports.
pub fn is_same_ui_element(a: &ElementData, b: &ElementData) -> bool {
    a.runtime_id == b.runtime_id
        && a.bounding_rectangle == b.bounding_rectangle
        && a.control_type_id == b.control_type_id
        && a.name == b.name
}

/// Short human-readable key for log lines.
pub fn element_key(e: &ElementData) -> String {
    format!(
        "#{} {} '{}'",
        e.unique_id,
        e.control_type_name(),
        e.name.as_deref().unwrap_or_default()
    )
}
