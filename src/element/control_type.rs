// ============================================================================
// Control type ids (UI Automation numbering)
// ============================================================================

pub const BUTTON: i32 = 50000;
pub const CALENDAR: i32 = 50001;
pub const CHECK_BOX: i32 = 50002;
pub const COMBO_BOX: i32 = 50003;
pub const EDIT: i32 = 50004;
pub const HYPERLINK: i32 = 50005;
pub const IMAGE: i32 = 50006;
pub const LIST_ITEM: i32 = 50007;
pub const LIST: i32 = 50008;
pub const MENU: i32 = 50009;
pub const MENU_BAR: i32 = 50010;
pub const MENU_ITEM: i32 = 50011;
pub const PROGRESS_BAR: i32 = 50012;
pub const RADIO_BUTTON: i32 = 50013;
pub const SCROLL_BAR: i32 = 50014;
pub const SLIDER: i32 = 50015;
pub const SPINNER: i32 = 50016;
pub const STATUS_BAR: i32 = 50017;
pub const TAB: i32 = 50018;
pub const TAB_ITEM: i32 = 50019;
pub const TEXT: i32 = 50020;
pub const TOOL_BAR: i32 = 50021;
pub const TOOL_TIP: i32 = 50022;
pub const TREE: i32 = 50023;
pub const TREE_ITEM: i32 = 50024;
pub const CUSTOM: i32 = 50025;
pub const GROUP: i32 = 50026;
pub const THUMB: i32 = 50027;
pub const DATA_GRID: i32 = 50028;
pub const DATA_ITEM: i32 = 50029;
pub const DOCUMENT: i32 = 50030;
pub const SPLIT_BUTTON: i32 = 50031;
pub const WINDOW: i32 = 50032;
pub const PANE: i32 = 50033;
pub const HEADER: i32 = 50034;
pub const HEADER_ITEM: i32 = 50035;
pub const TABLE: i32 = 50036;
pub const TITLE_BAR: i32 = 50037;
pub const SEPARATOR: i32 = 50038;
pub const SEMANTIC_ZOOM: i32 = 50039;
pub const APP_BAR: i32 = 50040;

const NAMES: [&str; 41] = [
    "Button",
    "Calendar",
    "CheckBox",
    "ComboBox",
    "Edit",
    "Hyperlink",
    "Image",
    "ListItem",
    "List",
    "Menu",
    "MenuBar",
    "MenuItem",
    "ProgressBar",
    "RadioButton",
    "ScrollBar",
    "Slider",
    "Spinner",
    "StatusBar",
    "Tab",
    "TabItem",
    "Text",
    "ToolBar",
    "ToolTip",
    "Tree",
    "TreeItem",
    "Custom",
    "Group",
    "Thumb",
    "DataGrid",
    "DataItem",
    "Document",
    "SplitButton",
    "Window",
    "Pane",
    "Header",
    "HeaderItem",
    "Table",
    "TitleBar",
    "Separator",
    "SemanticZoom",
    "AppBar",
];

/// Programmatic name of a control type, e.g. `Button` for 50000.
pub fn control_type_name(id: i32) -> Option<&'static str> {
    if id < BUTTON {
        return None;
    }
    NAMES.get((id - BUTTON) as usize).copied()
}

/// Display form used in reports and fingerprints: `Pane(50033)`, `Unknown(7)`.
pub fn display_name(id: i32) -> String {
    format!("{}({})", control_type_name(id).unwrap_or("Unknown"), id)
}

/// Reverse lookup, case-insensitive. Used by the fixture loader.
pub fn control_type_from_name(name: &str) -> Option<i32> {
    NAMES
        .iter()
        .position(|n| n.eq_ignore_ascii_case(name))
        .map(|i| BUTTON + i as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_line_up_with_ids() {
        assert_eq!(control_type_name(BUTTON), Some("Button"));
        assert_eq!(control_type_name(PANE), Some("Pane"));
        assert_eq!(control_type_name(APP_BAR), Some("AppBar"));
        assert_eq!(control_type_name(APP_BAR + 1), None);
        assert_eq!(control_type_name(0), None);
    }

    #[test]
    fn display_name_formats_unknown() {
        assert_eq!(display_name(SPLIT_BUTTON), "SplitButton(50031)");
        assert_eq!(display_name(0), "Unknown(0)");
    }

    #[test]
    fn reverse_lookup_ignores_case() {
        assert_eq!(control_type_from_name("listitem"), Some(LIST_ITEM));
        assert_eq!(control_type_from_name("nope"), None);
    }
}
