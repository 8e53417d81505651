//! Fixed role vocabularies for the interesting-node predicate.

/// Roles a user can operate.
pub(super) const CONTROL_ROLES: &[&str] = &[
    "button",
    "checkbox",
    "combobox",
    "listbox",
    "menu",
    "menubar",
    "menuitem",
    "menuitemcheckbox",
    "menuitemradio",
    "option",
    "progressbar",
    "radio",
    "scrollbar",
    "searchbox",
    "slider",
    "spinbutton",
    "switch",
    "tab",
    "tablist",
    "textbox",
    "tree",
    "treeitem",
    "link",
    "gridcell",
];

/// ARIA landmark roles.
pub(super) const LANDMARK_ROLES: &[&str] = &[
    "banner",
    "complementary",
    "contentinfo",
    "form",
    "main",
    "navigation",
    "region",
    "search",
];

/// Roles that are leaves regardless of their children.
pub(super) const LEAF_ROLES: &[&str] = &[
    "textbox",
    "searchbox",
    "image",
    "progressbar",
    "slider",
    "separator",
    "meter",
    "scrollbar",
    "spinbutton",
];

pub(super) fn is_control(role: &str) -> bool {
    CONTROL_ROLES.contains(&role)
}

pub(super) fn is_landmark(role: &str) -> bool {
    LANDMARK_ROLES.contains(&role)
}

pub(super) fn is_leaf_role(role: &str) -> bool {
    LEAF_ROLES.contains(&role)
}

/// Text-ish roles that do not make a parent a non-leaf.
pub(super) fn is_text_role(role: &str) -> bool {
    matches!(role, "StaticText" | "text" | "none")
}
