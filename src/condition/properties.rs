use crate::condition::condition::Condition;
use crate::condition::relationships::{any_ancestor, any_of, parent};
use crate::condition::string_property::{AUTOMATION_ID, CLASS_NAME};
use crate::condition::value::ValueCondition;
use crate::element::control_type::*;
use crate::element::ids::{framework, pattern};

// ============================================================================
// Control types
// ============================================================================

pub fn button() -> Condition {
    Condition::control_type(BUTTON)
}

pub fn data_item() -> Condition {
    Condition::control_type(DATA_ITEM)
}

pub fn document() -> Condition {
    Condition::control_type(DOCUMENT)
}

pub fn edit() -> Condition {
    Condition::control_type(EDIT)
}

pub fn hyperlink() -> Condition {
    Condition::control_type(HYPERLINK)
}

pub fn image() -> Condition {
    Condition::control_type(IMAGE)
}

pub fn list_item() -> Condition {
    Condition::control_type(LIST_ITEM)
}

pub fn menu_bar() -> Condition {
    Condition::control_type(MENU_BAR)
}

pub fn menu_item() -> Condition {
    Condition::control_type(MENU_ITEM)
}

pub fn pane() -> Condition {
    Condition::control_type(PANE)
}

pub fn progress_bar() -> Condition {
    Condition::control_type(PROGRESS_BAR)
}

pub fn text() -> Condition {
    Condition::control_type(TEXT)
}

pub fn tool_tip() -> Condition {
    Condition::control_type(TOOL_TIP)
}

pub fn window() -> Condition {
    Condition::control_type(WINDOW)
}

pub fn custom() -> Condition {
    Condition::control_type(CUSTOM)
}

fn control_types(ids: &[i32]) -> Condition {
    any_of(ids.iter().map(|id| Condition::control_type(*id)).collect())
}

// ============================================================================
// Boolean flags
// ============================================================================

pub fn is_keyboard_focusable() -> Condition {
    Condition::from_fn(|e| e.is_keyboard_focusable == Some(true)).described("IsKeyboardFocusable")
}

pub fn is_not_keyboard_focusable() -> Condition {
    (!is_keyboard_focusable()).described("IsNotKeyboardFocusable")
}

pub fn is_control_element() -> Condition {
    Condition::from_fn(|e| e.is_control_element == Some(true)).described("IsControlElement")
}

pub fn is_control_element_exists() -> Condition {
    Condition::from_fn(|e| e.is_control_element.is_some()).described("IsControlElementExists")
}

pub fn is_content_element() -> Condition {
    Condition::from_fn(|e| e.is_content_element == Some(true)).described("IsContentElement")
}

pub fn is_content_element_exists() -> Condition {
    Condition::from_fn(|e| e.is_content_element.is_some()).described("IsContentElementExists")
}

pub fn is_content_or_control_element() -> Condition {
    (is_content_element() | is_control_element()).described("IsContentOrControlElement")
}

pub fn is_enabled() -> Condition {
    Condition::from_fn(|e| e.is_enabled()).described("IsEnabled")
}

pub fn is_not_enabled() -> Condition {
    (!is_enabled()).described("IsNotEnabled")
}

pub fn is_off_screen() -> Condition {
    Condition::from_fn(|e| e.is_offscreen()).described("IsOffScreen")
}

pub fn is_not_off_screen() -> Condition {
    (!is_off_screen()).described("IsNotOffScreen")
}

// ============================================================================
// Bounding rectangle
// ============================================================================

pub fn bounding_rectangle_not_null() -> Condition {
    Condition::from_fn(|e| e.bounding_rectangle.is_some()).described("BoundingRectangle.NotNull")
}

pub fn bounding_rectangle_valid() -> Condition {
    Condition::from_fn(|e| e.bounding_rectangle.is_some_and(|r| !r.is_empty()))
        .described("BoundingRectangle.Valid")
}

/// The element's rectangle covers its parent's entirely and is strictly larger.
pub fn bounding_rectangle_completely_obscures_container() -> Condition {
    Condition::from_fn(|e| {
        let (Some(rect), Some(container)) = (
            e.bounding_rectangle,
            e.parent().and_then(|p| p.bounding_rectangle),
        ) else {
            return false;
        };
        rect.contains(&container) && rect.width * rect.height > container.width * container.height
    })
    .described("BoundingRectangle.CompletelyObscuresContainer")
}

// ============================================================================
// Frameworks
// ============================================================================

fn framework_is(id: &'static str) -> Condition {
    Condition::from_fn(move |e| e.is_framework(id)).described(&format!("Framework.Is({})", id))
}

pub fn win32() -> Condition {
    framework_is(framework::WIN32)
}

pub fn wpf() -> Condition {
    framework_is(framework::WPF)
}

pub fn xaml() -> Condition {
    framework_is(framework::XAML)
}

pub fn direct_ui() -> Condition {
    framework_is(framework::DIRECTUI)
}

pub fn chrome() -> Condition {
    framework_is(framework::CHROME)
}

pub fn edge() -> Condition {
    framework_is(framework::EDGE)
}

/// Chromium web content: a Chrome document, or anything inside one.
pub fn is_chromium_content() -> Condition {
    let chrome_document = chrome() & document();
    (chrome() & (document() | any_ancestor(chrome_document))).described("IsChromiumContent")
}

// ============================================================================
// Values
// ============================================================================

pub fn heading_level() -> ValueCondition {
    ValueCondition::new("HeadingLevel", |e| e.heading_level())
}

// ============================================================================
// Element groups
// ============================================================================

/// Interactive types a user expects to reach with the keyboard.
pub fn expected_to_be_focusable() -> Condition {
    control_types(&[
        BUTTON,
        CHECK_BOX,
        COMBO_BOX,
        EDIT,
        HYPERLINK,
        MENU_ITEM,
        RADIO_BUTTON,
        SLIDER,
        SPINNER,
        SPLIT_BUTTON,
        TAB_ITEM,
        TREE_ITEM,
        LIST_ITEM,
    ])
    .described("ExpectedToBeFocusable")
}

/// Types whose name is mandatory when they are exposed to assistive technology.
pub fn name_required() -> Condition {
    let optional = control_types(&[PANE, GROUP, SEPARATOR, THUMB, TITLE_BAR, SCROLL_BAR, TEXT]);
    (is_content_or_control_element() & !optional).described("NameRequired")
}

/// Types whose name legitimately repeats the control type word.
pub fn allow_same_name_and_control_type() -> Condition {
    control_types(&[CUSTOM, PANE, GROUP, TEXT, WINDOW, DOCUMENT, APP_BAR, TITLE_BAR])
        .described("AllowSameNameAndControlType")
}

pub fn is_control_element_true_required() -> Condition {
    control_types(&[
        BUTTON,
        CALENDAR,
        CHECK_BOX,
        COMBO_BOX,
        EDIT,
        HYPERLINK,
        LIST,
        LIST_ITEM,
        MENU,
        MENU_ITEM,
        PROGRESS_BAR,
        RADIO_BUTTON,
        SLIDER,
        SPINNER,
        SPLIT_BUTTON,
        TAB,
        TAB_ITEM,
        TREE,
        TREE_ITEM,
    ])
    .described("IsControlElementTrueRequired")
}

pub fn wpf_button() -> Condition {
    button() & wpf()
}

pub fn xaml_text_in_edit() -> Condition {
    text() & xaml() & parent(edit())
}

pub fn system_menu_bar() -> Condition {
    menu_bar() & AUTOMATION_ID.is("SystemMenuBar")
}

pub fn system_menu_item() -> Condition {
    menu_item() & parent(system_menu_bar())
}

/// Light dismiss buttons cover the whole window so clicking outside a combo box closes it.
pub fn light_dismiss_button() -> Condition {
    button() & is_not_keyboard_focusable() & xaml() & CLASS_NAME.is("ComboBoxLightDismiss")
}

pub fn grid_item_pattern() -> Condition {
    Condition::pattern(pattern::GRID_ITEM)
}
