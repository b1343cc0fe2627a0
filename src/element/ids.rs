/// Automation property ids carried in the sparse property bag.
pub mod property {
    pub const RUNTIME_ID: i32 = 30000;
    pub const BOUNDING_RECTANGLE: i32 = 30001;
    pub const CONTROL_TYPE: i32 = 30003;
    pub const LOCALIZED_CONTROL_TYPE: i32 = 30004;
    pub const NAME: i32 = 30005;
    pub const ACCELERATOR_KEY: i32 = 30006;
    pub const ACCESS_KEY: i32 = 30007;
    pub const IS_KEYBOARD_FOCUSABLE: i32 = 30009;
    pub const IS_ENABLED: i32 = 30010;
    pub const AUTOMATION_ID: i32 = 30011;
    pub const CLASS_NAME: i32 = 30012;
    pub const HELP_TEXT: i32 = 30013;
    pub const CULTURE: i32 = 30015;
    pub const IS_CONTROL_ELEMENT: i32 = 30017;
    pub const IS_CONTENT_ELEMENT: i32 = 30018;
    pub const IS_OFFSCREEN: i32 = 30022;
    pub const FRAMEWORK_ID: i32 = 30024;
    pub const LANDMARK_TYPE: i32 = 30157;
    pub const LOCALIZED_LANDMARK_TYPE: i32 = 30158;
    pub const HEADING_LEVEL: i32 = 30173;

    pub fn property_name(id: i32) -> &'static str {
        match id {
            RUNTIME_ID => "RuntimeId",
            BOUNDING_RECTANGLE => "BoundingRectangle",
            CONTROL_TYPE => "ControlType",
            LOCALIZED_CONTROL_TYPE => "LocalizedControlType",
            NAME => "Name",
            ACCELERATOR_KEY => "AcceleratorKey",
            ACCESS_KEY => "AccessKey",
            IS_KEYBOARD_FOCUSABLE => "IsKeyboardFocusable",
            IS_ENABLED => "IsEnabled",
            AUTOMATION_ID => "AutomationId",
            CLASS_NAME => "ClassName",
            HELP_TEXT => "HelpText",
            CULTURE => "Culture",
            IS_CONTROL_ELEMENT => "IsControlElement",
            IS_CONTENT_ELEMENT => "IsContentElement",
            IS_OFFSCREEN => "IsOffscreen",
            FRAMEWORK_ID => "FrameworkId",
            LANDMARK_TYPE => "LandmarkType",
            LOCALIZED_LANDMARK_TYPE => "LocalizedLandmarkType",
            HEADING_LEVEL => "HeadingLevel",
            _ => "Unknown",
        }
    }
}

/// Control pattern ids.
pub mod pattern {
    pub const INVOKE: i32 = 10000;
    pub const SELECTION: i32 = 10001;
    pub const VALUE: i32 = 10002;
    pub const RANGE_VALUE: i32 = 10003;
    pub const EXPAND_COLLAPSE: i32 = 10005;
    pub const GRID: i32 = 10006;
    pub const GRID_ITEM: i32 = 10007;
    pub const TABLE: i32 = 10012;
    pub const TABLE_ITEM: i32 = 10013;
    pub const TEXT: i32 = 10014;
    pub const TOGGLE: i32 = 10015;
}

/// Heading level values. `HEADING_LEVEL_NONE` means "not a heading".
pub mod heading {
    pub const HEADING_LEVEL_NONE: i32 = 80050;
    pub const HEADING_LEVEL_1: i32 = 80051;
    pub const HEADING_LEVEL_9: i32 = 80059;
}

/// Framework id strings as reported by providers.
pub mod framework {
    pub const WIN32: &str = "Win32";
    pub const WINFORM: &str = "WinForm";
    pub const WPF: &str = "WPF";
    pub const XAML: &str = "XAML";
    pub const DIRECTUI: &str = "DirectUI";
    pub const CHROME: &str = "Chrome";
    pub const EDGE: &str = "MicrosoftEdge";
}
